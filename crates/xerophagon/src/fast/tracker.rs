//! Serialized load → transition → save cycles over a [`FastStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::store::{FastStore, StorageError};

use super::machine::FastError;
use super::model::{ActiveFast, AppState, CompletedFast};

/// Errors from a tracker operation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The transition was rejected. Nothing was saved.
    #[error(transparent)]
    Fast(#[from] FastError),

    /// Loading or saving failed. The operation must be treated as not applied.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Single writer over the fasting document.
///
/// Each mutating call holds one lock across load, transition and save, so two
/// concurrent starts cannot both observe the idle state. Cheap to clone.
#[derive(Clone)]
pub struct FastTracker {
    store: Arc<dyn FastStore>,
    write_lock: Arc<Mutex<()>>,
}

impl FastTracker {
    pub fn new(store: Arc<dyn FastStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load the current document without taking the write lock.
    pub async fn snapshot(&self) -> Result<AppState, StorageError> {
        self.store.load().await
    }

    /// Start a fast at `now` and persist it.
    pub async fn start_fast(
        &self,
        goal_hours: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ActiveFast, TrackerError> {
        let fast = self
            .apply(|state| state.start_fast(goal_hours, now).cloned())
            .await?;

        info!(
            start_time = %fast.start_time,
            goal_hours = ?fast.goal_hours,
            "Fast started"
        );
        Ok(fast)
    }

    /// End the running fast at `now` and persist the updated history.
    pub async fn end_fast(&self, now: DateTime<Utc>) -> Result<CompletedFast, TrackerError> {
        let fast = self.apply(|state| state.end_fast(now)).await?;

        info!(
            start_time = %fast.start_time,
            duration_hours = fast.duration_hours,
            goal_reached = ?fast.goal_reached(),
            "Fast ended"
        );
        Ok(fast)
    }

    async fn apply<T>(
        &self,
        transition: impl FnOnce(&mut AppState) -> Result<T, FastError>,
    ) -> Result<T, TrackerError> {
        let _guard = self.write_lock.lock().await;

        let mut state = self.store.load().await?;
        let output = transition(&mut state)
            .inspect_err(|e| debug!(error = %e, "Transition rejected"))?;
        self.store.save(&state).await?;

        Ok(output)
    }
}
