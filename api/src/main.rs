// Dunes Explorer API server entry point

mod config;
mod db;
mod entity;
mod error;
mod handlers;
mod models;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, Router};
use http::{header, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::ApiConfig;
use db::DbPool;
use handlers::{
    get_address_balance_for_dune, get_address_balances, get_dune, get_dunes,
    get_events_by_txid, get_snapshot, get_snapshot_for_dune, get_utxo_balance_for_dune,
    get_utxo_balances, health_check, status, AppState,
};

fn load_env() {
    dotenv::dotenv().ok();
}

#[tokio::main]
async fn main() {
    load_env();
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    tracing::info!("Configuration loaded");

    let db_pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    let repositories = db_pool.repositories();
    let app_state = AppState {
        repositories: Arc::new(repositories),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .max_age(Duration::from_secs(3600));

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status))
        .route("/utxo/{outpoint}", get(get_utxo_balances))
        .route("/utxo/{outpoint}/{dune_id}", get(get_utxo_balance_for_dune))
        .route("/address/{address}", get(get_address_balances))
        .route(
            "/address/{address}/{dune_id}",
            get(get_address_balance_for_dune),
        )
        .route(
            "/snapshot/{start}/{end}/address/{address}",
            get(get_snapshot),
        )
        .route(
            "/snapshot/{start}/{end}/address/{address}/{dune_id}",
            get(get_snapshot_for_dune),
        )
        .route("/dunes", get(get_dunes))
        .route("/dunes/{dune_id}", get(get_dune))
        .route("/events/{txid}", get(get_events_by_txid))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
