// Handlers for the audit log

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ExplorerError, ExplorerResult};
use crate::handlers::AppState;
use crate::models::EventResponse;
use crate::services::dune_service;

/// Handler for GET /events/{txid} - events a transaction emitted
pub async fn get_events_by_txid(
    State(state): State<AppState>,
    Path(txid): Path<String>,
) -> ExplorerResult<Json<Vec<EventResponse>>> {
    if txid.len() != 64 || !txid.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ExplorerError::InvalidRequest(format!(
            "malformed txid: {}",
            txid
        )));
    }
    let events = dune_service::events_for_transaction(&state, &txid.to_lowercase()).await?;
    Ok(Json(events))
}
