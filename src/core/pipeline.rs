//! One poll tick: fetch, merge, evaluate, persist

use crate::config::Config;
use crate::core::bar_buffer::BarBuffer;
use crate::db::{SignalStore, StoreOutcome};
use crate::error::{MarketDataError, StorageError};
use crate::metrics::Metrics;
use crate::models::bar::Bar;
use crate::models::chart::ChartSnapshot;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::{Signal, SignalHistory};
use crate::services::market_data::MarketDataProvider;
use crate::signals::{Decision, SignalEngine};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// What a tick produced
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not enough bars buffered to evaluate
    Warming { have: usize, need: usize },
    NoSignal,
    /// A candidate matched the last accepted signal
    Suppressed(Signal),
    Emitted(Signal),
}

/// Caller-side state around the signal engine.
///
/// Owns the bar buffer and signal history; one tick at a time mutates them.
pub struct SignalPipeline {
    config: Config,
    engine: SignalEngine,
    buffer: BarBuffer,
    history: SignalHistory,
    trend_weakening: bool,
    latest: Option<IndicatorSnapshot>,
    chart: watch::Sender<ChartSnapshot>,
    data_provider: Arc<dyn MarketDataProvider + Send + Sync>,
    store: Arc<dyn SignalStore + Send + Sync>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalPipeline {
    pub fn new(
        config: Config,
        data_provider: Arc<dyn MarketDataProvider + Send + Sync>,
        store: Arc<dyn SignalStore + Send + Sync>,
    ) -> Self {
        let engine = SignalEngine::new(config.indicators.clone(), config.signals.clone());
        let buffer = BarBuffer::new(config.max_bars);
        let history = SignalHistory::new(config.history_limit);
        let (chart, _) = watch::channel(ChartSnapshot {
            symbol: config.symbol.clone(),
            interval: config.interval.clone(),
            ..ChartSnapshot::default()
        });
        Self {
            config,
            engine,
            buffer,
            history,
            trend_weakening: false,
            latest: None,
            chart,
            data_provider,
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Load the newest persisted signals so deduplication survives restarts.
    /// Returns how many were loaded.
    pub async fn seed_history(&mut self) -> Result<usize, StorageError> {
        let signals = self.store.recent_signals(self.history.capacity()).await?;
        self.history.seed(signals);
        if let Some(last) = self.history.last() {
            info!(
                signal_type = %last.signal_type,
                level = %last.level,
                price = last.price,
                time = last.time,
                "Loaded last signal from store"
            );
        }
        Ok(self.history.len())
    }

    /// Run one fetch, compute, decide cycle.
    ///
    /// A fetch failure leaves buffer and history untouched. When the update
    /// window no longer joins the buffer, the full lookback is refetched.
    pub async fn tick(&mut self) -> Result<TickOutcome, MarketDataError> {
        let start = Instant::now();
        if let Some(ref metrics) = self.metrics {
            metrics.polls_total.inc();
        }

        let limit = if self.buffer.is_empty() {
            self.config.initial_lookback
        } else {
            self.config.update_lookback
        };

        let fetched = self.fetch(limit).await?;

        let gap = self
            .config
            .interval_ms()
            .is_some_and(|interval| self.buffer.leaves_gap(&fetched, interval));
        let appended = if gap {
            warn!(
                symbol = %self.config.symbol,
                newest = self.buffer.last().map(|b| b.time),
                "Missed bars since last poll, refetching full window"
            );
            if let Some(ref metrics) = self.metrics {
                metrics.buffer_refills_total.inc();
            }
            let window = self.fetch(self.config.initial_lookback).await?;
            self.buffer.replace(window)
        } else {
            self.buffer.merge(fetched)
        };
        debug!(
            symbol = %self.config.symbol,
            appended = appended,
            buffered = self.buffer.len(),
            "Merged {} new bars",
            appended
        );

        let outcome = self.evaluate().await;
        self.publish_chart();

        if let Some(ref metrics) = self.metrics {
            metrics.bars_buffered.set(self.buffer.len() as i64);
            metrics
                .poll_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        Ok(outcome)
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<Bar>, MarketDataError> {
        match self
            .data_provider
            .get_bars(&self.config.symbol, &self.config.interval, limit)
            .await
        {
            Ok(bars) => Ok(bars),
            Err(e) => {
                error!(symbol = %self.config.symbol, error = %e, "Failed to fetch bars");
                if let Some(ref metrics) = self.metrics {
                    metrics.poll_failures_total.inc();
                }
                Err(e)
            }
        }
    }

    async fn evaluate(&mut self) -> TickOutcome {
        let need = self.engine.min_bars();
        if self.buffer.len() < need {
            debug!(have = self.buffer.len(), need = need, "Waiting for more data");
            return TickOutcome::Warming {
                have: self.buffer.len(),
                need,
            };
        }

        let evaluation = self.engine.evaluate(self.buffer.bars(), self.history.last());
        if evaluation.trend_weakening && !self.trend_weakening {
            warn!(symbol = %self.config.symbol, "MACD histogram shrinking, trend weakening");
        }
        self.trend_weakening = evaluation.trend_weakening;
        self.latest = evaluation.snapshot;

        match evaluation.decision {
            Decision::Insufficient => TickOutcome::Warming {
                have: self.buffer.len(),
                need,
            },
            Decision::NoCandidate => TickOutcome::NoSignal,
            Decision::Suppressed(candidate) => {
                debug!(
                    signal_type = %candidate.signal_type,
                    level = %candidate.level,
                    "Candidate repeats last accepted signal, suppressed"
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.signals_suppressed_total.inc();
                }
                TickOutcome::Suppressed(candidate)
            }
            Decision::Accepted(signal) => {
                info!(
                    symbol = %self.config.symbol,
                    signal_type = %signal.signal_type,
                    level = %signal.level,
                    price = signal.price,
                    time = signal.time,
                    "New signal: {} {} @ {}",
                    signal.level,
                    signal.signal_type,
                    signal.price
                );
                self.history.push(signal);
                if let Some(ref metrics) = self.metrics {
                    metrics
                        .signals_emitted_total
                        .with_label_values(&[signal.signal_type.as_str(), signal.level.as_str()])
                        .inc();
                }
                self.persist(&signal).await;
                TickOutcome::Emitted(signal)
            }
        }
    }

    fn publish_chart(&self) {
        self.chart.send_replace(ChartSnapshot {
            symbol: self.config.symbol.clone(),
            interval: self.config.interval.clone(),
            bars: self.buffer.bars().to_vec(),
            indicators: self.latest,
            trend_weakening: self.trend_weakening,
        });
    }

    /// Receiver that always holds the chart as of the last successful tick
    pub fn chart_feed(&self) -> watch::Receiver<ChartSnapshot> {
        self.chart.subscribe()
    }

    // Best effort: a store failure is logged and counted, never retried here.
    async fn persist(&self, signal: &Signal) {
        match self.store.store_signal(signal).await {
            Ok(StoreOutcome::Stored) => {
                debug!(signal_type = %signal.signal_type, level = %signal.level, "Signal stored");
            }
            Ok(StoreOutcome::Duplicate) => {
                debug!(
                    signal_type = %signal.signal_type,
                    level = %signal.level,
                    "Store skipped signal identical to its newest entry"
                );
            }
            Err(e) => {
                error!(error = %e, signal_type = %signal.signal_type, "Failed to store signal");
                if let Some(ref metrics) = self.metrics {
                    metrics.signal_store_failures_total.inc();
                }
            }
        }
    }

    pub fn history(&self) -> &SignalHistory {
        &self.history
    }

    pub fn buffer(&self) -> &BarBuffer {
        &self.buffer
    }

    pub fn last_signal(&self) -> Option<&Signal> {
        self.history.last()
    }

    pub fn trend_weakening(&self) -> bool {
        self.trend_weakening
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
