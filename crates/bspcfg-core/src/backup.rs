//! Pre-write file backups

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Copies files aside before they are overwritten
#[derive(Debug, Clone)]
pub struct BackupDir {
    dir: PathBuf,
}

impl BackupDir {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Copy `path` into the backup directory and return the backup ID.
    /// The copy is named `<file>_<timestamp>.<id8>.bak`.
    ///
    /// # Errors
    /// Returns `BackupFailed` if the copy fails, or `Io` if the backup
    /// directory cannot be created
    pub fn backup(&self, path: &Path) -> ConfigResult<String> {
        fs::create_dir_all(&self.dir).map_err(|e| ConfigError::io(&self.dir, &e))?;

        let backup_id = uuid::Uuid::new_v4().to_string();
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let file_name = path
            .file_name()
            .map_or_else(|| "config".to_string(), |n| n.to_string_lossy().to_string());
        let backup_name = format!("{}_{}.{}.bak", file_name, timestamp, &backup_id[..8]);
        let backup_path = self.dir.join(&backup_name);

        fs::copy(path, &backup_path).map_err(|e| {
            ConfigError::BackupFailed(format!("Failed to backup {}: {}", path.display(), e))
        })?;

        debug!(source = %path.display(), backup = %backup_path.display(), "backup created");
        Ok(backup_id)
    }
}
