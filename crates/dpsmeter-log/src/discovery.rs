//! Locating the combat log the game is currently writing

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Picks which log file to watch
pub trait LogDiscovery {
    /// Most recently modified candidate, if any
    fn latest_log_file(&self) -> Option<PathBuf>;

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Newest file with a given extension inside one directory
#[derive(Debug, Clone)]
pub struct DirectoryDiscovery {
    dir: PathBuf,
    extension: String,
}

impl DirectoryDiscovery {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    /// Scan the directory. A missing directory is `Ok(None)`.
    pub fn find_latest(&self) -> std::io::Result<Option<PathBuf>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !self.matches_extension(&path) {
                continue;
            }

            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            if latest
                .as_ref()
                .map_or(true, |(latest_time, _)| modified > *latest_time)
            {
                latest = Some((modified, path));
            }
        }

        Ok(latest.map(|(_, path)| path))
    }
}

impl LogDiscovery for DirectoryDiscovery {
    fn latest_log_file(&self) -> Option<PathBuf> {
        match self.find_latest() {
            Ok(latest) => latest,
            Err(err) => {
                tracing::warn!("Failed to scan {}: {err}", self.dir.display());
                None
            }
        }
    }
}

/// Always the same file, no discovery
#[derive(Debug, Clone)]
pub struct FixedFile(pub PathBuf);

impl LogDiscovery for FixedFile {
    fn latest_log_file(&self) -> Option<PathBuf> {
        self.file_exists(&self.0).then(|| self.0.clone())
    }
}
