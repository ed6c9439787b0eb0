// Handlers for historical balance snapshots

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ExplorerError, ExplorerResult};
use crate::handlers::{validate_address, validate_dune_id, AppState};
use crate::models::BalanceMap;
use crate::services::snapshot_service;

fn check_range(start: u32, end: u32) -> ExplorerResult<()> {
    if start > end {
        return Err(ExplorerError::InvalidRequest(format!(
            "invalid snapshot range {}..{}",
            start, end
        )));
    }
    Ok(())
}

/// Handler for GET /snapshot/{start}/{end}/address/{address} - balances the
/// address held at the end of block `end`
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path((start, end, address)): Path<(u32, u32, String)>,
) -> ExplorerResult<Json<BalanceMap>> {
    check_range(start, end)?;
    validate_address(&address)?;
    let balances = snapshot_service::snapshot_balances(&state, &address, end as i32, None).await?;
    Ok(Json(balances))
}

/// Handler for GET /snapshot/{start}/{end}/address/{address}/{dune_id} -
/// same, single dune
pub async fn get_snapshot_for_dune(
    State(state): State<AppState>,
    Path((start, end, address, dune_id)): Path<(u32, u32, String, String)>,
) -> ExplorerResult<Json<BalanceMap>> {
    check_range(start, end)?;
    validate_address(&address)?;
    validate_dune_id(&dune_id)?;
    let balances =
        snapshot_service::snapshot_balances(&state, &address, end as i32, Some(&dune_id)).await?;
    Ok(Json(balances))
}
