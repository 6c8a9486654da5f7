//! One-shot daily sync, for running under an external scheduler (cron).
//!
//! Usage: run_daily_sync [--force]
//!   --force  run even if the last success is inside the sync interval

use std::env;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nft_market_tracker::{
    config::Config,
    jobs::daily_sync::run_if_due,
    services::{daily_sync::run_daily_sync, mnemonic::MnemonicClient, store::Store},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nft_market_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let force = env::args().any(|arg| arg == "--force");

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let db = Database::connect(config.database_url.as_str()).await?;
    migration::Migrator::up(&db, None).await?;

    let store = Store::new(db);
    let mnemonic = MnemonicClient::new(
        config.mnemonic_api_key.clone(),
        config.mnemonic_base_url.clone(),
        config.top_collections_limit,
    );

    if force {
        // Bypass the status table and surface failures through the exit code
        let report = run_daily_sync(&store, &mnemonic).await?;
        println!(
            "✓ Daily sync done: {} data points, {} ranking tables, {} floor prices",
            report.data_points_written,
            report.rankings.len(),
            report.floor.updated
        );
    } else {
        run_if_due(&store, &mnemonic, config.daily_sync_interval_secs).await;
    }

    Ok(())
}
