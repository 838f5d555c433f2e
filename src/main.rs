//! VitalHub server entry point.
//!
//! Wires configuration, logging, the database pool, and the HTTP
//! server together.

use tracing_subscriber::{EnvFilter, fmt};

use vitalhub_core::config::AppConfig;
use vitalhub_core::error::AppError;
use vitalhub_database::DatabasePool;
use vitalhub_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let env = std::env::var("VITALHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(environment = %env, version = env!("CARGO_PKG_VERSION"), "Starting VitalHub");

    if let Err(err) = run(config).await {
        tracing::error!("Server error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    let state = vitalhub_api::state::AppState::new(config, db.into_pool());
    vitalhub_api::app::run_server(state).await
}
