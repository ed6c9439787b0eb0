//! Historical balance reconstruction.
//!
//! The balance of an address at the end of block `end` is the sum over utxo
//! rows created at or before `end` and not spent until after it. No state is
//! rewound; the utxo table carries enough history on its own.

use std::collections::BTreeMap;

use crate::error::ExplorerResult;
use crate::handlers::AppState;
use crate::models::{join_u128, BalanceMap};
use crate::services::balance_service;

pub async fn snapshot_balances(
    state: &AppState,
    address: &str,
    end: i32,
    only_dune: Option<&str>,
) -> ExplorerResult<BalanceMap> {
    let repos = &state.repositories;

    let Some(address_row) = repos.balance.address_by_string(address).await? else {
        return Ok(BalanceMap::new());
    };

    let utxos = repos
        .utxo
        .utxos_for_address_at(address_row.id, end)
        .await?;
    let utxo_ids: Vec<i64> = utxos.iter().map(|utxo| utxo.id).collect();

    let mut totals: BTreeMap<i64, u128> = BTreeMap::new();
    for row in repos.utxo.balances_for_utxos(&utxo_ids).await? {
        *totals.entry(row.dune_id).or_default() += join_u128(row.balance_0, row.balance_1);
    }

    let amounts: Vec<(i64, u128)> = totals.into_iter().collect();
    balance_service::build_balance_map(state, amounts, only_dune).await
}
