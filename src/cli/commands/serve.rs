use tracing::info;

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::relay::LocalBroker;
use crate::db::initialize::open_and_init;
use crate::errors::{AppError, AppResult};
use crate::http::{self, AppState};

/// Handle the `serve` command: migrate, wire the state, listen.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut cfg = cfg.clone();
    if let Commands::Serve { port: Some(port) } = cmd {
        cfg.port = *port;
    }

    let db_path = cfg.database.clone();
    let pool = tokio::task::spawn_blocking(move || open_and_init(&db_path))
        .await
        .map_err(|e| AppError::Other(format!("startup task failed: {}", e)))??;
    info!(database = %cfg.database, "database ready");

    let broker = LocalBroker::new();
    broker.declare(&cfg.queue_name);
    info!(queue = %cfg.queue_name, "relay queue declared");

    let state = AppState::from_config(pool, &cfg, broker);
    http::serve(state, cfg.port).await
}
