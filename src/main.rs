use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nft_market_tracker::{
    config::Config,
    handlers::collections::{get_collection_history, get_top_collections},
    jobs::daily_sync::start_daily_sync_job,
    services::{mnemonic::MnemonicClient, store::Store},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nft_market_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(config.database_url.as_str()).await?;

    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    let store = Store::new(db);
    let mnemonic = MnemonicClient::new(
        config.mnemonic_api_key.clone(),
        config.mnemonic_base_url.clone(),
        config.top_collections_limit,
    );

    start_daily_sync_job(
        store.clone(),
        Arc::new(mnemonic),
        config.daily_sync_interval_secs,
    )
    .await;

    let state = AppState::new(store);

    let app = Router::new()
        .route("/", get(health))
        .route("/api/collections/top", get(get_top_collections))
        .route(
            "/api/collections/{address}/history",
            get(get_collection_history),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "NFT market tracker is running"
}
