//! Backend configuration

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Directory holding the blob files and the credential database
    pub data_dir: PathBuf,
}

impl Config {
    /// Read configuration from `WHODINI_PORT` / `WHODINI_DATA_DIR`,
    /// falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env::var("WHODINI_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let data_dir = env::var("WHODINI_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        Self { port, data_dir }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
        }
    }
}
