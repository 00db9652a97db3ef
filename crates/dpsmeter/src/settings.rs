//! Config file and log directory resolution

use dpsmeter_core::Config;
use dpsmeter_log::Paths;
use std::path::{Path, PathBuf};

/// Load `explicit`, or the platform config file. Problems fall back to
/// defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> Config {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match Paths::new() {
            Ok(paths) => paths.config_file(),
            Err(err) => {
                tracing::warn!("Using default config: {err}");
                return Config::default();
            }
        },
    };

    match Config::load(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Using default config: {err}");
            Config::default()
        }
    }
}

/// `--dir`, or the game's default combat log directory
pub fn log_dir(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => Ok(Paths::new()?.combat_log_dir()),
    }
}
