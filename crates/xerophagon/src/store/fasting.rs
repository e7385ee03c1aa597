//! Fasting document storage trait.

use async_trait::async_trait;

use crate::fast::AppState;

use super::error::StorageResult;

/// Storage interface for the single fasting document.
///
/// Implementations hold no locks. Callers that mutate must serialize their
/// load/save cycles (see [`FastTracker`](crate::fast::FastTracker)).
#[async_trait]
pub trait FastStore: Send + Sync {
    /// Load the current document.
    ///
    /// Returns an empty `AppState` when nothing has been saved yet.
    /// Never returns a partially populated document.
    async fn load(&self) -> StorageResult<AppState>;

    /// Replace the stored document with `state`.
    ///
    /// Must be atomic - either fully succeeds or has no effect.
    async fn save(&self, state: &AppState) -> StorageResult<()>;
}
