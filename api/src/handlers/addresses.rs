// Handlers for address balance lookups

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ExplorerResult;
use crate::handlers::{validate_address, validate_dune_id, AppState};
use crate::models::BalanceMap;
use crate::services::balance_service;

/// Handler for GET /address/{address} - aggregate balances of an address
pub async fn get_address_balances(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ExplorerResult<Json<BalanceMap>> {
    validate_address(&address)?;
    let balances = balance_service::address_balances(&state, &address, None).await?;
    Ok(Json(balances))
}

/// Handler for GET /address/{address}/{dune_id} - same, single dune
pub async fn get_address_balance_for_dune(
    State(state): State<AppState>,
    Path((address, dune_id)): Path<(String, String)>,
) -> ExplorerResult<Json<BalanceMap>> {
    validate_address(&address)?;
    validate_dune_id(&dune_id)?;
    let balances = balance_service::address_balances(&state, &address, Some(&dune_id)).await?;
    Ok(Json(balances))
}
