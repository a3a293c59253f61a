//! WaveSignal Worker
//!
//! Polls Bybit for klines, evaluates indicators and emits BUY/SELL signals.
//! Runs a single pipeline; only one worker per symbol should be active.

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use wavesignal::config::{self, Config};
use wavesignal::core::http::{start_server, AppState};
use wavesignal::core::pipeline::SignalPipeline;
use wavesignal::core::scheduler::PollScheduler;
use wavesignal::db::{InMemorySignalStore, QuestDatabase, SignalStore};
use wavesignal::logging;
use wavesignal::metrics::Metrics;
use wavesignal::services::bybit::BybitMarketDataProvider;
use wavesignal::services::market_data::MarketDataProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    info!("Starting WaveSignal Worker");
    info!(environment = %config::get_environment(), "Environment");
    info!(
        symbol = %config.symbol,
        interval = %config.interval,
        poll_seconds = config.poll_interval_seconds,
        "Watching {} on {}m klines, polling every {}s",
        config.symbol,
        config.interval,
        config.poll_interval_seconds
    );

    let metrics = Arc::new(Metrics::new()?);

    let store: Arc<dyn SignalStore + Send + Sync> =
        match QuestDatabase::connect(&config::get_questdb_url(), config.symbol.clone()).await {
            Ok(db) => {
                info!("QuestDB connected");
                metrics.database_connected.set(1.0);
                Arc::new(db)
            }
            Err(e) => {
                warn!(error = %e, "Failed to connect to QuestDB, signals kept in memory only");
                metrics.database_connected.set(0.0);
                Arc::new(InMemorySignalStore::new())
            }
        };

    let provider: Arc<dyn MarketDataProvider + Send + Sync> =
        Arc::new(BybitMarketDataProvider::new());

    let poll_interval = config.poll_interval_seconds;
    let mut pipeline =
        SignalPipeline::new(config, provider, store.clone()).with_metrics(metrics.clone());

    match pipeline.seed_history().await {
        Ok(count) => info!(count = count, "Seeded signal history from store"),
        Err(e) => warn!(error = %e, "Could not load signal history, starting empty"),
    }

    let chart_feed = pipeline.chart_feed();
    let pipeline = Arc::new(Mutex::new(pipeline));

    // Prime the buffer right away instead of waiting for the first cron tick
    if let Some(outcome) = PollScheduler::run_tick(&pipeline, Some(&metrics)).await {
        info!(outcome = ?outcome, "Initial poll complete");
    }

    let scheduler = PollScheduler::new(pipeline.clone(), poll_interval)?.with_metrics(metrics.clone());
    scheduler.start().await?;

    let port = config::get_worker_port();
    let state = AppState::new(metrics.clone(), Some(store.clone())).with_chart(chart_feed);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
