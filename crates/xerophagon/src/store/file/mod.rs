//! File-based storage implementation.
//!
//! The fasting document is stored as pretty-printed JSON. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous document intact.

mod fasting;

use std::path::Path;

use tokio::fs;

use crate::store::error::{StorageError, StorageResult};

pub use fasting::FileFastStore;

/// Write `contents` to `tmp_path`, flush it, then rename it over `final_path`.
///
/// Creates the parent directory of `final_path` if needed.
pub(crate) async fn atomic_write_file(
    tmp_path: &Path,
    final_path: &Path,
    contents: &[u8],
) -> StorageResult<()> {
    if let Some(dir) = final_path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| StorageError::file_io(dir, e))?;
    }

    {
        use tokio::io::AsyncWriteExt;

        let mut file = fs::File::create(tmp_path)
            .await
            .map_err(|e| StorageError::file_io(tmp_path, e))?;
        file.write_all(contents)
            .await
            .map_err(|e| StorageError::file_io(tmp_path, e))?;
        // fsync before rename so the new name never points at a torn file
        file.sync_all()
            .await
            .map_err(|e| StorageError::file_io(tmp_path, e))?;
    }

    fs::rename(tmp_path, final_path)
        .await
        .map_err(|e| StorageError::file_io(final_path, e))?;

    Ok(())
}
