//! Cron-based scheduler driving the poll loop

use crate::core::pipeline::{SignalPipeline, TickOutcome};
use crate::metrics::Metrics;
use chrono::Utc;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Cron expression (with seconds field) firing every `interval_seconds`.
///
/// Intervals of a minute or more are rounded down to whole minutes.
pub fn cron_expression(interval_seconds: u64) -> Result<String, String> {
    match interval_seconds {
        0 => Err("Scheduler disabled: interval_seconds is 0".to_string()),
        s if s >= 60 => Ok(format!("0 */{} * * * *", s / 60)),
        s => Ok(format!("*/{} * * * * *", s)),
    }
}

/// Fires a pipeline tick on every cron tick.
///
/// Ticks never overlap: if the previous one is still running when the next
/// fires, the new one is dropped. Stopping only takes effect between ticks.
pub struct PollScheduler {
    pipeline: Arc<Mutex<SignalPipeline>>,
    schedule: Schedule,
    metrics: Option<Arc<Metrics>>,
    shutdown: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PollScheduler {
    pub fn new(
        pipeline: Arc<Mutex<SignalPipeline>>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let cron_expr = cron_expression(interval_seconds)?;
        let schedule = Schedule::from_str(&cron_expr)
            .map_err(|e| format!("Invalid cron expression '{}': {}", cron_expr, e))?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "Polling every {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            pipeline,
            schedule,
            metrics: None,
            shutdown,
            handle: Mutex::new(None),
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run a single tick unless one is already in progress.
    /// Returns `None` when the tick was dropped or the fetch failed.
    pub async fn run_tick(
        pipeline: &Arc<Mutex<SignalPipeline>>,
        metrics: Option<&Arc<Metrics>>,
    ) -> Option<TickOutcome> {
        let Ok(mut guard) = pipeline.try_lock() else {
            warn!("Previous poll still running, dropping this tick");
            if let Some(metrics) = metrics {
                metrics.polls_skipped_total.inc();
            }
            return None;
        };

        match guard.tick().await {
            Ok(outcome) => {
                debug!(outcome = ?outcome, "Poll complete");
                Some(outcome)
            }
            // Already logged by the pipeline; the next tick retries.
            Err(_) => None,
        }
    }

    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut handle = self.handle.lock().await;
        if handle.is_some() {
            return Err("poll scheduler already running".into());
        }
        self.shutdown.send_replace(false);

        let pipeline = self.pipeline.clone();
        let schedule = self.schedule.clone();
        let metrics = self.metrics.clone();
        let mut shutdown = self.shutdown.subscribe();

        *handle = Some(tokio::spawn(async move {
            loop {
                let Some(next_tick) = schedule.upcoming(Utc).next() else {
                    warn!("Cron schedule has no upcoming ticks, poll loop exiting");
                    break;
                };
                let wait = (next_tick - Utc::now()).to_std().unwrap_or_default();

                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = tokio::time::sleep(wait) => {}
                }

                let pipeline = pipeline.clone();
                let metrics = metrics.clone();
                tokio::spawn(async move {
                    Self::run_tick(&pipeline, metrics.as_ref()).await;
                });
            }
            debug!("Poll loop exited");
        }));

        info!("Poll loop started");
        Ok(())
    }

    /// Stop scheduling new ticks. A tick already running completes.
    pub async fn stop(&self) {
        let Some(handle) = self.handle.lock().await.take() else {
            return;
        };
        self.shutdown.send_replace(true);
        if let Err(e) = handle.await {
            warn!(error = %e, "Poll loop task ended abnormally");
        }
        info!("Poll loop stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.handle.lock().await.is_some()
    }
}
