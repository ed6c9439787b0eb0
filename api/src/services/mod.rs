pub mod balance_service;
pub mod dune_service;
pub mod snapshot_service;
