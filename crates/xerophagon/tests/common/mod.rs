//! Common test utilities.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use xerophagon::fast::{DEFAULT_PAGE_SIZE, FastTracker};
use xerophagon::server::{self, ServerLimits, ServerState};
use xerophagon::store::file::FileFastStore;
use xerophagon::views::Views;

/// A data file path inside a fresh temporary directory.
pub fn temp_data_path() -> PathBuf {
    let tmp = TempDir::new().unwrap();

    // Leak the TempDir so it doesn't get cleaned up during the test.
    // This is fine for tests - the OS will clean up on process exit.
    let tmp = Box::leak(Box::new(tmp));
    tmp.path().join("data").join("data.json")
}

/// Create a test `ServerState` backed by the given data file.
pub fn test_app_state_at(data_path: PathBuf) -> ServerState {
    let store = Arc::new(FileFastStore::new(data_path));
    ServerState {
        tracker: FastTracker::new(store),
        views: Views::new().unwrap(),
        page_size: DEFAULT_PAGE_SIZE,
    }
}

/// Create a test app with an empty data file location.
pub async fn test_app() -> Router {
    test_app_at(temp_data_path())
}

/// Create a test app backed by the given data file.
pub fn test_app_at(data_path: PathBuf) -> Router {
    server::build_app(test_app_state_at(data_path), ServerLimits::default())
}
