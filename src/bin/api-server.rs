//! WaveSignal API Server
//!
//! Serves health, metrics and the signal history API. Stateless apart from
//! the database connection, so it can be scaled horizontally.

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use wavesignal::config::{self, Config};
use wavesignal::core::http::{start_server, AppState};
use wavesignal::db::{QuestDatabase, SignalStore};
use wavesignal::logging;
use wavesignal::metrics::Metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let port = config::get_http_port();
    let symbol = Config::from_env()?.symbol;

    info!("Starting WaveSignal API Server");
    info!(environment = %config::get_environment(), "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);

    let store: Option<Arc<dyn SignalStore + Send + Sync>> =
        match QuestDatabase::connect(&config::get_questdb_url(), symbol).await {
            Ok(db) => {
                info!("QuestDB connected");
                metrics.database_connected.set(1.0);
                Some(Arc::new(db))
            }
            Err(e) => {
                warn!(error = %e, "Failed to connect to QuestDB, signal endpoints will return 503");
                None
            }
        };

    let state = AppState::new(metrics, store);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
