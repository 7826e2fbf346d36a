pub mod queenstown_gardens;
pub mod sherwood;
