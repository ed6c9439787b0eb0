// Indexer status endpoint

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ExplorerResult;
use crate::handlers::AppState;

/// Handler for GET /status - indexing progress per network
pub async fn status(State(state): State<AppState>) -> ExplorerResult<Json<Value>> {
    let bookmarks = state.repositories.status.bookmarks().await?;

    let networks: Vec<Value> = bookmarks
        .into_iter()
        .map(|bookmark| {
            json!({
                "network": bookmark.network,
                "block_height": bookmark.block_height,
                "block_hash": bookmark.block_hash,
                "confirmed": bookmark.confirmed,
            })
        })
        .collect();

    Ok(Json(json!({ "networks": networks })))
}
