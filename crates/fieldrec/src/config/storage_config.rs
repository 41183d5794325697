use crate::AppResult;

use std::{fs, path::PathBuf};

/// Recording file name prefix; files are `<prefix>_NNNN.wav`.
pub(crate) const DEFAULT_FILE_PREFIX: &str = "rec";

/// Storage destination settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Local mount point of the storage medium. On the device this is the
    /// card's filesystem root; the host build uses a plain directory.
    pub mount_dir: PathBuf,
    /// File name prefix for recordings.
    pub file_prefix: String,
}

impl StorageConfig {
    /// Create the local mount directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the path cannot be created, for example
    /// when a path component exists as a regular file.
    pub fn ensure_mount_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.mount_dir)?;
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mount_dir: PathBuf::from("sdcard"),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}
