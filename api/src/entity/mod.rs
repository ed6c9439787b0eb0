//! Read-side SeaORM entities over the indexer schema.
//!
//! Split u128 balance columns (`*_0` low, `*_1` high) are recombined in the
//! services before they reach a response.

pub mod addresses;
pub mod balances;
pub mod bookmarks;
pub mod dunes;
pub mod events;
pub mod prelude;
pub mod transactions;
pub mod utxo_balances;
pub mod utxos;
