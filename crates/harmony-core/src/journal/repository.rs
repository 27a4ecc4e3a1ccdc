//! Journal store trait.
//!
//! Defines the interface to the hosted per-user key-value store.

use async_trait::async_trait;

use super::model::JournalRecord;
use crate::error::Result;

/// An abstract store for journal entries and the rolling summary.
///
/// # Implementation Notes
///
/// Writes are fire-and-forget from the session's point of view: an
/// implementation without an authenticated user logs the drop and returns
/// `Ok(())`.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Appends an entry under a fresh push key.
    async fn save_entry(&self, record: JournalRecord) -> Result<()>;

    /// Reads the stored summary.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(summary))`: A summary exists
    /// - `Ok(None)`: No summary yet, or no authenticated user
    /// - `Err(_)`: Error occurred during retrieval
    async fn fetch_summary(&self) -> Result<Option<String>>;

    /// Overwrites the stored summary.
    async fn save_summary(&self, summary: &str) -> Result<()>;
}
