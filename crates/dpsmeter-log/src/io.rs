//! Reading a log that another process keeps open for writing

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Something the parser can pull the full current log text from
pub trait LogSource {
    /// Human-readable origin, used in errors and logs
    fn name(&self) -> String;

    /// Entire current content
    fn read_content(&self) -> std::io::Result<String>;
}

/// Read the whole file without taking an exclusive lock.
///
/// `File::open` shares read, write and delete access on Windows and never
/// locks on Unix, so an active writer neither blocks nor fails the read.
/// Invalid UTF-8 (e.g. a multi-byte character cut mid-write) is replaced.
pub fn read_shared(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A combat log file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_content(&self) -> std::io::Result<String> {
        read_shared(&self.path)
    }
}

impl LogSource for str {
    fn name(&self) -> String {
        "<memory>".to_string()
    }

    fn read_content(&self) -> std::io::Result<String> {
        Ok(self.to_string())
    }
}
