//! Prometheus metrics for the poll loop and the HTTP API

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,

    pub polls_total: IntCounter,
    pub poll_failures_total: IntCounter,
    pub poll_duration_seconds: Histogram,
    pub polls_skipped_total: IntCounter,
    pub bars_buffered: IntGauge,
    pub buffer_refills_total: IntCounter,

    pub signals_emitted_total: IntCounterVec,
    pub signals_suppressed_total: IntCounter,
    pub signal_store_failures_total: IntCounter,
    pub database_connected: Gauge,

    /// Labelled by method, matched route and status code
    pub http_requests_total: IntCounterVec,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let polls_total = IntCounter::new("polls_total", "Poll ticks executed")?;
        let poll_failures_total =
            IntCounter::new("poll_failures_total", "Poll ticks that failed to fetch market data")?;
        let poll_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "poll_duration_seconds",
            "Duration of fetch, compute and decide per tick",
        ))?;
        let polls_skipped_total = IntCounter::new(
            "polls_skipped_total",
            "Ticks dropped because the previous tick was still running",
        )?;
        let bars_buffered = IntGauge::new("bars_buffered", "Bars held in the rolling buffer")?;
        let buffer_refills_total = IntCounter::new(
            "buffer_refills_total",
            "Full-window refetches after missed bars",
        )?;

        let signals_emitted_total = IntCounterVec::new(
            Opts::new("signals_emitted_total", "Accepted signals"),
            &["type", "level"],
        )?;
        let signals_suppressed_total = IntCounter::new(
            "signals_suppressed_total",
            "Candidates suppressed as duplicates of the last accepted signal",
        )?;
        let signal_store_failures_total =
            IntCounter::new("signal_store_failures_total", "Signals the store failed to persist")?;
        let database_connected = Gauge::new("database_connected", "1 when the signal database is reachable")?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests served"),
            &["method", "route", "status"],
        )?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(polls_total.clone()))?;
        registry.register(Box::new(poll_failures_total.clone()))?;
        registry.register(Box::new(poll_duration_seconds.clone()))?;
        registry.register(Box::new(polls_skipped_total.clone()))?;
        registry.register(Box::new(bars_buffered.clone()))?;
        registry.register(Box::new(buffer_refills_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(signals_suppressed_total.clone()))?;
        registry.register(Box::new(signal_store_failures_total.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            polls_total,
            poll_failures_total,
            poll_duration_seconds,
            polls_skipped_total,
            bars_buffered,
            buffer_refills_total,
            signals_emitted_total,
            signals_suppressed_total,
            signal_store_failures_total,
            database_connected,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
