pub mod crystal_ballroom;
pub mod revolution_hall;
