pub mod config;
pub mod datetext;
pub mod dedup;
pub mod error;
pub mod fetch;
pub mod ident;
pub mod logging;
pub mod pipeline;
pub mod registry;
pub mod scrapers;
pub mod storage;
pub mod types;
