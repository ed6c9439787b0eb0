pub mod constants;
pub mod dune_name;
pub mod dunestone;
pub mod errors;
pub mod lot;
pub mod models;
pub mod rules;
