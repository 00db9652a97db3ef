//! Default locations for combat logs and configuration

use std::path::PathBuf;

/// Resolves platform directories
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_local_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Paths {
    pub fn new() -> std::io::Result<Self> {
        let not_found = |what: &str| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{what} directory not found"),
            )
        };

        let data_local_dir = dirs::data_local_dir().ok_or_else(|| not_found("local data"))?;
        let config_dir = dirs::config_dir().ok_or_else(|| not_found("config"))?;

        Ok(Self {
            data_local_dir,
            config_dir,
        })
    }

    /// Where the game writes its combat logs
    pub fn combat_log_dir(&self) -> PathBuf {
        self.data_local_dir
            .join("TL")
            .join("SAVED")
            .join("COMBATLOGS")
    }

    /// Meter config file
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("dpsmeter").join("config.json")
    }
}
