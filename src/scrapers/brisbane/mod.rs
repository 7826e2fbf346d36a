pub mod powerhouse;
pub mod the_triffid;
