//! HTTP endpoint server using Axum

use axum::{
    extract::{MatchedPath, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::db::{SignalStore, StoreOutcome};
use crate::metrics::Metrics;
use crate::models::chart::ChartSnapshot;
use crate::models::signal::{Signal, SignalLevel, SignalType, DEFAULT_HISTORY_LIMIT};

const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Instant,
    /// `None` when no database is reachable; signal routes answer 503
    pub store: Option<Arc<dyn SignalStore + Send + Sync>>,
    /// Live chart from the poll loop; only the worker has one
    pub chart: Option<watch::Receiver<ChartSnapshot>>,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, store: Option<Arc<dyn SignalStore + Send + Sync>>) -> Self {
        Self {
            metrics,
            start_time: Instant::now(),
            store,
            chart: None,
        }
    }

    pub fn with_chart(mut self, chart: watch::Receiver<ChartSnapshot>) -> Self {
        self.chart = Some(chart);
        self
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let status = if state.store.is_some() {
        "healthy"
    } else {
        "degraded"
    };
    Json(json!({
        "status": status,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": "wavesignal",
        "store_available": state.store.is_some(),
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.export().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Count and time every request by matched route
async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let metrics = &state.metrics;
    metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    metrics.http_requests_in_flight.dec();

    let status = response.status();
    let elapsed = start.elapsed();
    metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), route.as_str(), status.as_str()])
        .inc();
    metrics
        .http_request_duration_seconds
        .observe(elapsed.as_secs_f64());

    if status.is_server_error() {
        error!(method = %method, route = %route, status = %status, elapsed_ms = elapsed.as_millis() as u64, "Request failed");
    } else if status.is_client_error() {
        warn!(method = %method, route = %route, status = %status, "Request rejected");
    }

    response
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

/// Incoming signal; fields are optional so validation can answer 400
#[derive(Debug, Deserialize)]
struct CreateSignalRequest {
    #[serde(rename = "type")]
    signal_type: Option<String>,
    level: Option<String>,
    price: Option<f64>,
    time: Option<i64>,
}

impl CreateSignalRequest {
    fn validate(self) -> Result<Signal, String> {
        let signal_type: SignalType = self
            .signal_type
            .ok_or("missing type")?
            .parse()?;
        let level: SignalLevel = self.level.ok_or("missing level")?.parse()?;
        let price = self.price.ok_or("missing price")?;
        if !price.is_finite() || price <= 0.0 {
            return Err(format!("invalid price {}", price));
        }
        let time = self.time.ok_or("missing time")?;
        if time <= 0 {
            return Err(format!("invalid time {}", time));
        }
        Ok(Signal::new(signal_type, level, price, time))
    }
}

#[derive(Debug, Serialize)]
struct SignalResponse {
    #[serde(rename = "type")]
    signal_type: SignalType,
    level: SignalLevel,
    price: f64,
    time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_time: Option<String>,
}

impl From<Signal> for SignalResponse {
    fn from(signal: Signal) -> Self {
        Self {
            signal_type: signal.signal_type,
            level: signal.level,
            price: signal.price,
            time: signal.time,
            display_time: signal.timestamp().map(|t| t.to_rfc3339()),
        }
    }
}

fn require_store(state: &AppState) -> Result<&Arc<dyn SignalStore + Send + Sync>, StatusCode> {
    state.store.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// Most recent signals, newest first
async fn list_signals(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<SignalResponse>>, StatusCode> {
    let store = require_store(&state)?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let signals = store.recent_signals(limit).await.map_err(|e| {
        error!(error = %e, "Failed to load signals");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(signals.into_iter().map(Into::into).collect()))
}

/// Persist a signal produced elsewhere
async fn create_signal(
    State(state): State<AppState>,
    Json(request): Json<CreateSignalRequest>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let store = require_store(&state)?;

    let signal = match request.validate() {
        Ok(signal) => signal,
        Err(reason) => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": format!("Invalid signal data: {}", reason) })),
            ))
        }
    };

    let outcome = store.store_signal(&signal).await.map_err(|e| {
        error!(error = %e, "Failed to save signal");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let status = match outcome {
        StoreOutcome::Stored => StatusCode::CREATED,
        StoreOutcome::Duplicate => StatusCode::OK,
    };
    Ok((
        status,
        Json(json!({ "success": true, "outcome": outcome })),
    ))
}

/// Buffered bars, latest indicators and the trend warning
async fn chart(State(state): State<AppState>) -> Result<Json<ChartSnapshot>, StatusCode> {
    let chart = state.chart.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    let snapshot = chart.borrow().clone();
    Ok(Json(snapshot))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals", get(list_signals).post(create_signal))
        .route("/api/chart", get(chart))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(middleware::from_fn_with_state(state.clone(), track_requests))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!("Metrics endpoint available at http://0.0.0.0:{}/metrics", port);
    axum::serve(listener, app).await?;

    Ok(())
}
