pub mod fast;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use xerophagon::config::Config;
use xerophagon::fast::FastTracker;
use xerophagon::store::file::FileFastStore;

/// Load config and open the tracker over the resolved data file.
async fn open_tracker(
    config_path: &str,
    data_override: Option<&Path>,
) -> Result<(Config, FastTracker)> {
    let config = Config::load(config_path).await?;

    let data_path = match data_override {
        Some(path) => path.to_path_buf(),
        None => config.data_path(Path::new(config_path)),
    };
    tracing::debug!(path = %data_path.display(), "Using data file");

    let tracker = FastTracker::new(Arc::new(FileFastStore::new(data_path)));
    Ok((config, tracker))
}
