//! Signal persistence

pub mod memory;
pub mod questdb;

pub use memory::InMemorySignalStore;
pub use questdb::QuestDatabase;

use crate::error::StorageError;
use crate::models::signal::Signal;
use crate::signals::DedupPolicy;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Duplicate rule every store applies against its newest persisted signal.
/// Independent of the generator's in-memory rule so restarts stay safe.
pub const STORE_DEDUP_POLICY: DedupPolicy = DedupPolicy::TypeAndLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOutcome {
    Stored,
    /// Matched the newest persisted signal and was not written
    Duplicate,
}

#[async_trait]
pub trait SignalStore {
    async fn store_signal(&self, signal: &Signal) -> Result<StoreOutcome, StorageError>;

    /// Newest `limit` signals, newest first
    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>, StorageError>;
}
