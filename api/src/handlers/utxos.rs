// Handlers for utxo balance lookups

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ExplorerResult;
use crate::handlers::{parse_outpoint, validate_dune_id, AppState};
use crate::models::BalanceMap;
use crate::services::balance_service;

/// Handler for GET /utxo/{txid:vout} - balances held by a utxo
pub async fn get_utxo_balances(
    State(state): State<AppState>,
    Path(outpoint): Path<String>,
) -> ExplorerResult<Json<BalanceMap>> {
    let (txid, vout) = parse_outpoint(&outpoint)?;
    let balances = balance_service::utxo_balances(&state, &txid, vout, None).await?;
    Ok(Json(balances))
}

/// Handler for GET /utxo/{txid:vout}/{dune_id} - same, single dune
pub async fn get_utxo_balance_for_dune(
    State(state): State<AppState>,
    Path((outpoint, dune_id)): Path<(String, String)>,
) -> ExplorerResult<Json<BalanceMap>> {
    let (txid, vout) = parse_outpoint(&outpoint)?;
    validate_dune_id(&dune_id)?;
    let balances = balance_service::utxo_balances(&state, &txid, vout, Some(&dune_id)).await?;
    Ok(Json(balances))
}
