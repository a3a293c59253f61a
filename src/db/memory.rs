//! Process-local signal store

use crate::db::{SignalStore, StoreOutcome, STORE_DEDUP_POLICY};
use crate::error::StorageError;
use crate::models::signal::Signal;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Keeps signals in memory; used when no database is configured.
#[derive(Debug, Default)]
pub struct InMemorySignalStore {
    // oldest first
    signals: RwLock<Vec<Signal>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signals(oldest_first: Vec<Signal>) -> Self {
        Self {
            signals: RwLock::new(oldest_first),
        }
    }

    pub async fn len(&self) -> usize {
        self.signals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.signals.read().await.is_empty()
    }
}

#[async_trait]
impl SignalStore for InMemorySignalStore {
    async fn store_signal(&self, signal: &Signal) -> Result<StoreOutcome, StorageError> {
        let mut signals = self.signals.write().await;
        if let Some(last) = signals.last() {
            if STORE_DEDUP_POLICY.is_duplicate(last, signal) {
                return Ok(StoreOutcome::Duplicate);
            }
        }
        signals.push(*signal);
        Ok(StoreOutcome::Stored)
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>, StorageError> {
        let signals = self.signals.read().await;
        Ok(signals.iter().rev().take(limit).copied().collect())
    }
}
