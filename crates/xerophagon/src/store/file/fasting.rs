//! File-based fasting document storage.
//!
//! Layout:
//! ```text
//! {data_dir}/
//!   data.json        # The whole document
//!   data.json.tmp    # Present only while a save is in flight
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::fast::AppState;
use crate::store::error::{StorageError, StorageResult};
use crate::store::fasting::FastStore;

/// File-based implementation of `FastStore`.
///
/// The containing directory is created on the first save.
#[derive(Debug, Clone)]
pub struct FileFastStore {
    path: PathBuf,
}

impl FileFastStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("data.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FastStore for FileFastStore {
    async fn load(&self) -> StorageResult<AppState> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No data file yet, starting empty");
                return Ok(AppState::default());
            }
            Err(e) => return Err(StorageError::file_io(&self.path, e)),
        };

        serde_json::from_str(&contents)
            .map_err(|e| StorageError::file_deserialization(&self.path, e.to_string()))
    }

    async fn save(&self, state: &AppState) -> StorageResult<()> {
        let mut json = serde_json::to_string_pretty(state)
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        json.push('\n');

        super::atomic_write_file(&self.temp_path(), &self.path, json.as_bytes()).await?;

        tracing::debug!(
            path = %self.path.display(),
            history = state.fasting_history.len(),
            active = state.is_active(),
            "Saved fasting data"
        );
        Ok(())
    }
}
