// Handlers for dune metadata

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ExplorerResult;
use crate::handlers::{validate_dune_id, AppState};
use crate::models::{DuneListResponse, DuneResponse};
use crate::services::dune_service;

#[derive(Debug, Deserialize)]
pub struct ListDunesQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Handler for GET /dunes - paged listing of etched dunes
pub async fn get_dunes(
    State(state): State<AppState>,
    Query(params): Query<ListDunesQuery>,
) -> ExplorerResult<Json<DuneListResponse>> {
    let limit = params.limit.unwrap_or(50).min(500);
    let offset = params.offset.unwrap_or(0);
    let response = dune_service::list_dunes(&state, limit, offset).await?;
    Ok(Json(response))
}

/// Handler for GET /dunes/{dune_id} - one dune by protocol id
pub async fn get_dune(
    State(state): State<AppState>,
    Path(dune_id): Path<String>,
) -> ExplorerResult<Json<DuneResponse>> {
    validate_dune_id(&dune_id)?;
    let response = dune_service::get_dune(&state, &dune_id).await?;
    Ok(Json(response))
}
