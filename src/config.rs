//! Environment-driven configuration.
//!
//! Every setting has a default; `.env` is loaded by the binaries via dotenvy
//! before `Config::from_env` runs.

use crate::error::ConfigError;
use crate::signals::DedupPolicy;
use std::env;
use std::str::FromStr;

pub const DEFAULT_BYBIT_BASE_URL: &str = "https://api.bybit.com";
pub const DEFAULT_QUESTDB_URL: &str = "host=localhost port=8812 user=admin password=quest dbname=qdb";

/// Deployment environment (`ENVIRONMENT`, default "sandbox")
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_questdb_url() -> String {
    env::var("QUESTDB_URL").unwrap_or_else(|_| DEFAULT_QUESTDB_URL.to_string())
}

pub fn get_bybit_base_url() -> String {
    env::var("BYBIT_BASE_URL").unwrap_or_else(|_| DEFAULT_BYBIT_BASE_URL.to_string())
}

pub fn get_http_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

/// Port the worker exposes `/health` and `/metrics` on
pub fn get_worker_port() -> u16 {
    env::var("WORKER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(9090)
}

/// Look-back lengths for every indicator
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub wt_channel_length: usize,
    pub wt_average_length: usize,
    pub wt_signal_length: usize,
    pub ema_trend_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub volume_avg_period: usize,
}

impl IndicatorParams {
    /// Bars needed before every indicator the generator reads is meaningful
    pub fn min_bars(&self) -> usize {
        [
            self.ema_trend_period,
            self.rsi_period + 1,
            self.macd_slow + self.macd_signal,
            self.volume_avg_period,
            self.wt_signal_length + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            wt_channel_length: 10,
            wt_average_length: 21,
            wt_signal_length: 4,
            ema_trend_period: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            volume_avg_period: 20,
        }
    }
}

/// Decision thresholds for the signal generator
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub volume_spike_multiplier: f64,
    pub rsi_midline: f64,
    /// When false, trend agreement only contributes to the level
    pub require_trend: bool,
    pub dedup: DedupPolicy,
    /// BUY candidates additionally need `wt1 < wt_oversold`
    pub wt_oversold: Option<f64>,
    /// SELL candidates additionally need `wt1 > wt_overbought`
    pub wt_overbought: Option<f64>,
    /// MACD histogram below this fraction of |MACD| flags a weakening trend
    pub trend_warning_ratio: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            volume_spike_multiplier: 1.8,
            rsi_midline: 50.0,
            require_trend: true,
            dedup: DedupPolicy::Type,
            wt_oversold: None,
            wt_overbought: None,
            trend_warning_ratio: 0.10,
        }
    }
}

/// Worker configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub symbol: String,
    pub interval: String,
    pub poll_interval_seconds: u64,
    /// Bars requested while the buffer is empty
    pub initial_lookback: usize,
    /// Bars requested on every later poll
    pub update_lookback: usize,
    pub max_bars: usize,
    pub history_limit: usize,
    pub indicators: IndicatorParams,
    pub signals: SignalParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol: "DOGEUSDT".to_string(),
            interval: "1".to_string(),
            poll_interval_seconds: 5,
            initial_lookback: 1000,
            update_lookback: 2,
            max_bars: 1000,
            history_limit: crate::models::DEFAULT_HISTORY_LIMIT,
            indicators: IndicatorParams::default(),
            signals: SignalParams::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut config = Self {
            symbol: lookup("SYMBOL").unwrap_or(defaults.symbol),
            interval: lookup("KLINE_INTERVAL").unwrap_or(defaults.interval),
            poll_interval_seconds: parse_or(&lookup, "POLL_INTERVAL_SECONDS", defaults.poll_interval_seconds)?,
            initial_lookback: parse_or(&lookup, "INITIAL_LOOKBACK", defaults.initial_lookback)?,
            update_lookback: parse_or(&lookup, "UPDATE_LOOKBACK", defaults.update_lookback)?,
            max_bars: parse_or(&lookup, "MAX_BARS", defaults.max_bars)?,
            history_limit: parse_or(&lookup, "SIGNAL_HISTORY_LIMIT", defaults.history_limit)?,
            indicators: defaults.indicators,
            signals: defaults.signals,
        };

        config.signals.require_trend = parse_or(&lookup, "REQUIRE_TREND", config.signals.require_trend)?;
        config.signals.wt_oversold = parse_optional(&lookup, "WT_OVERSOLD")?;
        config.signals.wt_overbought = parse_optional(&lookup, "WT_OVERBOUGHT")?;
        if let Some(raw) = lookup("DEDUP_POLICY") {
            config.signals.dedup = raw.parse().map_err(|_| invalid("DEDUP_POLICY", &raw))?;
        }

        if config.poll_interval_seconds == 0 {
            return Err(invalid("POLL_INTERVAL_SECONDS", "0"));
        }
        if config.max_bars < config.indicators.min_bars() {
            return Err(invalid("MAX_BARS", &config.max_bars.to_string()));
        }

        Ok(config)
    }

    /// Length of one bar of `interval` in milliseconds.
    ///
    /// `None` for intervals without a fixed length (monthly) or unknown codes.
    pub fn interval_ms(&self) -> Option<i64> {
        const MINUTE_MS: i64 = 60_000;
        match self.interval.trim() {
            "D" => Some(24 * 60 * MINUTE_MS),
            "W" => Some(7 * 24 * 60 * MINUTE_MS),
            "M" => None,
            minutes => minutes
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .map(|m| m * MINUTE_MS),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw)),
        None => Ok(default),
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| raw.trim().parse().map_err(|_| invalid(key, &raw)))
        .transpose()
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}
