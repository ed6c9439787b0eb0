pub mod client;
mod error;
mod provider;

pub use client::BitcoinClient;
pub use error::BitcoinClientError;
pub use provider::{BitcoinProvider, PrevoutInfo};
