//! SeaORM entities for the indexer schema.
//!
//! Balance-bearing tables store u128 amounts as two signed 64-bit halves
//! (`*_0` low, `*_1` high); see `domain::lot` for the reinterpretation.

pub mod addresses;
pub mod balances;
pub mod block_statuses;
pub mod bookmarks;
pub mod dunes;
pub mod events;
pub mod transactions;
pub mod utxo_balances;
pub mod utxos;
