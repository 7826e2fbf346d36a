pub mod fox_cabaret;
pub mod rickshaw_theatre;
