//! Dunes Indexer - library crate
//!
//! Watches the Bitcoin blockchain from the protocol genesis height, decodes
//! dunestones embedded in transaction OP_RETURN outputs, and maintains the
//! off-chain ledger of which addresses and UTXOs hold which dunes.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod utils;
