// Handlers for the query surface: thin parameter validation over services

mod addresses;
mod dunes;
mod events;
mod health;
mod snapshots;
mod status;
mod utxos;

pub use addresses::{get_address_balance_for_dune, get_address_balances};
pub use dunes::{get_dune, get_dunes};
pub use events::get_events_by_txid;
pub use health::health_check;
pub use snapshots::{get_snapshot, get_snapshot_for_dune};
pub use status::status;
pub use utxos::{get_utxo_balance_for_dune, get_utxo_balances};

use std::sync::Arc;

use bitcoincore_rpc::bitcoin::address::NetworkUnchecked;
use bitcoincore_rpc::bitcoin::Address as BtcAddress;

use crate::db::Repositories;
use crate::error::{ExplorerError, ExplorerResult};

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    pub repositories: Arc<Repositories>,
}

/// Parse a `txid:vout` outpoint path segment
pub(crate) fn parse_outpoint(outpoint: &str) -> ExplorerResult<(String, i32)> {
    let (txid, vout) = outpoint
        .split_once(':')
        .ok_or_else(|| ExplorerError::InvalidRequest("expected txid:vout".to_string()))?;

    if txid.len() != 64 || !txid.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ExplorerError::InvalidRequest(format!(
            "malformed txid: {}",
            txid
        )));
    }
    let vout: u32 = vout
        .parse()
        .map_err(|_| ExplorerError::InvalidRequest(format!("malformed vout: {}", vout)))?;

    Ok((txid.to_lowercase(), vout as i32))
}

/// Reject strings that are not parseable Bitcoin addresses
pub(crate) fn validate_address(address: &str) -> ExplorerResult<()> {
    address
        .parse::<BtcAddress<NetworkUnchecked>>()
        .map_err(|_| ExplorerError::InvalidRequest(format!("malformed address: {}", address)))?;
    Ok(())
}

/// Validate a `block:tx` dune protocol id
pub(crate) fn validate_dune_id(dune_id: &str) -> ExplorerResult<()> {
    let valid = dune_id
        .split_once(':')
        .map(|(block, tx)| block.parse::<u32>().is_ok() && tx.parse::<u32>().is_ok())
        .unwrap_or(false);
    if !valid {
        return Err(ExplorerError::InvalidRequest(format!(
            "malformed dune protocol id: {}",
            dune_id
        )));
    }
    Ok(())
}
