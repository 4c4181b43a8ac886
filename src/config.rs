//! Environment-driven configuration with logged fallbacks.

use std::path::{Path, PathBuf};
use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Runtime configuration. Every value has a default suitable for local
/// development.
pub struct Config {
    /// Port to bind on (`TABLON_PORT`).
    pub port: u16,
    /// Directory holding the stores and upload directories
    /// (`TABLON_DATA_DIR`).
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Self {
        Self {
            port: try_load("TABLON_PORT", "3000"),
            data_dir: PathBuf::from(try_load::<String>("TABLON_DATA_DIR", ".")),
        }
    }

    /// Path of the events store file.
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("eventos.csv")
    }

    /// Path of the contacts store file.
    pub fn contacts_path(&self) -> PathBuf {
        self.data_dir.join("contacts.csv")
    }

    /// Directory for uploaded images.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Directory for uploaded video files.
    pub fn videos_dir(&self) -> PathBuf {
        self.data_dir.join(Path::new("static").join("videos"))
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
