//! Dune metadata and audit-log queries.

use std::collections::HashMap;

use crate::entity::dunes;
use crate::error::{ExplorerError, ExplorerResult};
use crate::handlers::AppState;
use crate::models::{
    event_type_name, join_u128, DuneListResponse, DuneResponse, EventResponse,
};

fn join_optional(low: Option<i64>, high: Option<i64>) -> Option<String> {
    match (low, high) {
        (Some(low), Some(high)) => Some(join_u128(low, high).to_string()),
        _ => None,
    }
}

fn to_response(dune: dunes::Model) -> DuneResponse {
    DuneResponse {
        dune_protocol_id: dune.dune_protocol_id,
        name: dune.name,
        symbol: dune.symbol,
        decimals: dune.decimals,
        premine: join_u128(dune.premine_0, dune.premine_1).to_string(),
        mints: join_u128(dune.mints_0, dune.mints_1).to_string(),
        mint_cap: join_optional(dune.mint_cap_0, dune.mint_cap_1),
        mint_amount: join_optional(dune.mint_amount_0, dune.mint_amount_1),
        mint_start: dune.mint_start,
        mint_end: dune.mint_end,
        mint_offset_start: dune.mint_offset_start,
        mint_offset_end: dune.mint_offset_end,
        price_amount: dune.price_amount,
        price_pay_to: dune.price_pay_to,
        turbo: dune.turbo,
        unmintable: dune.unmintable,
        burnt_amount: join_u128(dune.burnt_amount_0, dune.burnt_amount_1).to_string(),
    }
}

/// Paged listing of etched dunes
pub async fn list_dunes(
    state: &AppState,
    limit: u64,
    offset: u64,
) -> ExplorerResult<DuneListResponse> {
    let repos = &state.repositories;
    let total = repos.dune.count().await?;
    let dunes = repos.dune.list(limit, offset).await?;
    Ok(DuneListResponse {
        total,
        dunes: dunes.into_iter().map(to_response).collect(),
    })
}

/// One dune by protocol id
pub async fn get_dune(state: &AppState, protocol_id: &str) -> ExplorerResult<DuneResponse> {
    let dune = state
        .repositories
        .dune
        .by_protocol_id(protocol_id)
        .await?
        .ok_or_else(|| ExplorerError::NotFound(format!("dune {} not found", protocol_id)))?;
    Ok(to_response(dune))
}

/// Audit-log entries of one transaction, in emission order
pub async fn events_for_transaction(
    state: &AppState,
    txid: &str,
) -> ExplorerResult<Vec<EventResponse>> {
    let repos = &state.repositories;

    let Some(transaction) = repos.utxo.transaction_by_hash(txid).await? else {
        return Ok(Vec::new());
    };

    let events = repos.event.events_for_transaction(transaction.id).await?;

    let mut dune_ids: Vec<i64> = events.iter().map(|e| e.dune_id).collect();
    dune_ids.dedup();
    let dunes: HashMap<i64, String> = repos
        .dune
        .by_ids(&dune_ids)
        .await?
        .into_iter()
        .map(|dune| (dune.id, dune.dune_protocol_id))
        .collect();

    let mut address_ids: Vec<i64> = events
        .iter()
        .flat_map(|e| [e.from_address_id, e.to_address_id])
        .collect();
    address_ids.sort_unstable();
    address_ids.dedup();
    let addresses: HashMap<i64, String> = repos
        .balance
        .addresses_by_ids(&address_ids)
        .await?
        .into_iter()
        .map(|address| (address.id, address.address))
        .collect();

    Ok(events
        .into_iter()
        .map(|event| EventResponse {
            event_type: event_type_name(event.event_type).to_string(),
            block: event.block,
            dune_protocol_id: dunes
                .get(&event.dune_id)
                .cloned()
                .unwrap_or_default(),
            amount: join_u128(event.amount_0, event.amount_1).to_string(),
            from_address: addresses.get(&event.from_address_id).cloned(),
            to_address: addresses.get(&event.to_address_id).cloned(),
        })
        .collect())
}
