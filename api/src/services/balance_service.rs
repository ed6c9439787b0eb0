//! Balance queries for utxos and addresses.

use std::collections::HashMap;

use crate::entity::dunes;
use crate::error::ExplorerResult;
use crate::handlers::AppState;
use crate::models::{join_u128, BalanceEntry, BalanceMap};

/// Balances held by one utxo, optionally narrowed to a single dune
pub async fn utxo_balances(
    state: &AppState,
    txid: &str,
    vout: i32,
    only_dune: Option<&str>,
) -> ExplorerResult<BalanceMap> {
    let repos = &state.repositories;

    let Some(transaction) = repos.utxo.transaction_by_hash(txid).await? else {
        return Ok(BalanceMap::new());
    };
    let Some(utxo) = repos.utxo.utxo_at(transaction.id, vout).await? else {
        return Ok(BalanceMap::new());
    };

    let rows = repos.utxo.balances_for_utxo(utxo.id).await?;
    let amounts: Vec<(i64, u128)> = rows
        .iter()
        .map(|row| (row.dune_id, join_u128(row.balance_0, row.balance_1)))
        .collect();

    build_balance_map(state, amounts, only_dune).await
}

/// Aggregate balances of one address, optionally narrowed to a single dune
pub async fn address_balances(
    state: &AppState,
    address: &str,
    only_dune: Option<&str>,
) -> ExplorerResult<BalanceMap> {
    let repos = &state.repositories;

    let Some(address_row) = repos.balance.address_by_string(address).await? else {
        return Ok(BalanceMap::new());
    };

    let rows = repos.balance.balances_for_address(address_row.id).await?;
    let amounts: Vec<(i64, u128)> = rows
        .iter()
        .map(|row| (row.dune_id, join_u128(row.balance_0, row.balance_1)))
        .filter(|(_, balance)| *balance > 0)
        .collect();

    build_balance_map(state, amounts, only_dune).await
}

/// Resolve dune metadata and shape `(dune_id, amount)` pairs into the
/// protocol-id-keyed response map
pub async fn build_balance_map(
    state: &AppState,
    amounts: Vec<(i64, u128)>,
    only_dune: Option<&str>,
) -> ExplorerResult<BalanceMap> {
    let dune_ids: Vec<i64> = amounts.iter().map(|(id, _)| *id).collect();
    let dunes: HashMap<i64, dunes::Model> = state
        .repositories
        .dune
        .by_ids(&dune_ids)
        .await?
        .into_iter()
        .map(|dune| (dune.id, dune))
        .collect();

    let mut map = BalanceMap::new();
    for (dune_id, balance) in amounts {
        let Some(dune) = dunes.get(&dune_id) else {
            continue;
        };
        if let Some(only) = only_dune {
            if dune.dune_protocol_id != only {
                continue;
            }
        }
        map.insert(
            dune.dune_protocol_id.clone(),
            BalanceEntry {
                name: dune.name.clone(),
                symbol: dune.symbol.clone(),
                decimals: dune.decimals,
                balance: balance.to_string(),
            },
        );
    }
    Ok(map)
}
