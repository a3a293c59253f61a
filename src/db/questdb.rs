//! QuestDB signal store over the PostgreSQL wire protocol

use crate::db::{SignalStore, StoreOutcome, STORE_DEDUP_POLICY};
use crate::error::StorageError;
use crate::models::signal::{Signal, SignalLevel, SignalType};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};

const SELECT_SIGNALS: &str = "SELECT type, level, price, bar_time FROM signals WHERE symbol = $1 ORDER BY timestamp DESC";

pub struct QuestDatabase {
    client: Client,
    symbol: String,
}

impl QuestDatabase {
    /// Connect and make sure the signals table exists
    pub async fn connect(url: &str, symbol: impl Into<String>) -> Result<Self, StorageError> {
        let (client, connection) = tokio_postgres::connect(url, NoTls)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to connect to QuestDB: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "QuestDB connection error");
            }
        });

        let db = Self {
            client,
            symbol: symbol.into(),
        };
        db.init_schema().await?;
        info!(symbol = %db.symbol, "QuestDB signal store ready");

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        // QuestDB syntax: designated TIMESTAMP column, partitioned by day
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS signals (
                    timestamp TIMESTAMP,
                    symbol SYMBOL,
                    type SYMBOL,
                    level SYMBOL,
                    price DOUBLE,
                    bar_time LONG
                ) TIMESTAMP(timestamp) PARTITION BY DAY",
                &[],
            )
            .await?;
        Ok(())
    }

    async fn newest_signal(&self) -> Result<Option<Signal>, StorageError> {
        let query = format!("{} LIMIT 1", SELECT_SIGNALS);
        let rows = self.client.query(&query, &[&self.symbol]).await?;
        rows.first().map(decode_signal).transpose()
    }
}

fn decode_signal(row: &Row) -> Result<Signal, StorageError> {
    let signal_type: String = row.try_get(0)?;
    let level: String = row.try_get(1)?;
    let price: f64 = row.try_get(2)?;
    let time: i64 = row.try_get(3)?;

    Ok(Signal::new(
        signal_type.parse::<SignalType>().map_err(StorageError::Decode)?,
        level.parse::<SignalLevel>().map_err(StorageError::Decode)?,
        price,
        time,
    ))
}

#[async_trait]
impl SignalStore for QuestDatabase {
    async fn store_signal(&self, signal: &Signal) -> Result<StoreOutcome, StorageError> {
        if let Some(last) = self.newest_signal().await? {
            if STORE_DEDUP_POLICY.is_duplicate(&last, signal) {
                debug!(
                    symbol = %self.symbol,
                    signal_type = %signal.signal_type,
                    level = %signal.level,
                    "Skipping signal identical to the newest stored one"
                );
                return Ok(StoreOutcome::Duplicate);
            }
        }

        let timestamp: NaiveDateTime = signal
            .timestamp()
            .unwrap_or_else(Utc::now)
            .naive_utc();

        self.client
            .execute(
                "INSERT INTO signals (timestamp, symbol, type, level, price, bar_time)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &timestamp,
                    &self.symbol,
                    &signal.signal_type.as_str(),
                    &signal.level.as_str(),
                    &signal.price,
                    &signal.time,
                ],
            )
            .await?;

        Ok(StoreOutcome::Stored)
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>, StorageError> {
        let query = format!("{} LIMIT {}", SELECT_SIGNALS, limit);
        let rows = self.client.query(&query, &[&self.symbol]).await?;
        rows.iter().map(decode_signal).collect()
    }
}
