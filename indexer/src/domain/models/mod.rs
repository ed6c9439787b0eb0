//! In-memory entity models manipulated by the transition engine.
//!
//! These are the staging-side twins of the persistence entities: balances are
//! full u128 here and only split into i64 halves at the store boundary.

mod address;
mod balance;
mod dune;
mod event;
mod transaction;
mod utxo;

pub use address::Address;
pub use balance::Balance;
pub use dune::Dune;
pub use event::{Event, EventType};
pub use transaction::TransactionRow;
pub use utxo::{Utxo, UtxoBalance};
