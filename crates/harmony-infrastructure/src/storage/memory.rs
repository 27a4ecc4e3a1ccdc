//! In-process journal store used in offline mode and tests.

use async_trait::async_trait;
use harmony_core::error::Result;
use harmony_core::journal::{JournalRecord, JournalStore};
use tokio::sync::RwLock;

/// Keeps every record and the summary in memory.
#[derive(Default)]
pub struct InMemoryJournalStore {
    entries: RwLock<Vec<JournalRecord>>,
    summary: RwLock<Option<String>>,
}

impl InMemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a summary from an earlier session.
    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            entries: RwLock::default(),
            summary: RwLock::new(Some(summary.into())),
        }
    }

    pub async fn entries(&self) -> Vec<JournalRecord> {
        self.entries.read().await.clone()
    }

    pub async fn summary(&self) -> Option<String> {
        self.summary.read().await.clone()
    }
}

#[async_trait]
impl JournalStore for InMemoryJournalStore {
    async fn save_entry(&self, record: JournalRecord) -> Result<()> {
        tracing::debug!("[Persistence] Stored {} in memory", record.kind());
        self.entries.write().await.push(record);
        Ok(())
    }

    async fn fetch_summary(&self) -> Result<Option<String>> {
        Ok(self.summary.read().await.clone())
    }

    async fn save_summary(&self, summary: &str) -> Result<()> {
        *self.summary.write().await = Some(summary.to_string());
        Ok(())
    }
}
