//! Error types for the collaborators around the signal core.
//!
//! The indicator and decision code never fails; these cover fetching,
//! persistence and configuration.

use thiserror::Error;

/// Failures while fetching bars from the exchange
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// Transport-level failure (connect, timeout, non-success status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange answered but reported an error
    #[error("exchange API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The payload did not match the expected kline schema
    #[error("malformed kline payload: {0}")]
    Malformed(String),
}

impl MarketDataError {
    /// Transport failures and server-side statuses are worth another attempt;
    /// API rejections and schema errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            MarketDataError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map(|s| s.is_server_error()).unwrap_or(true)
            }
            MarketDataError::Api { .. } | MarketDataError::Malformed(_) => false,
        }
    }
}

/// Failures in the signal store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to signal store: {0}")]
    Connection(String),

    #[error("signal store query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("invalid stored signal: {0}")]
    Decode(String),
}

/// Invalid configuration values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: String, value: String },
}
