use std::path::PathBuf;

use crate::db::sqlite_ledger::default_db_path;
use crate::engine::config::{ConfigError, EngineConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: PathBuf,
    /// Directory for daily rolling log files; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    pub engine_config_path: Option<PathBuf>,
}

impl Config {
    /// Reads the process environment, loading `.env` first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let db_path = std::env::var("MASTERY_DB_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let log_dir = resolve_log_dir(
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            std::env::var("LOG_DIR").ok().as_deref(),
        );

        let engine_config_path = std::env::var("ENGINE_CONFIG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            log_level,
            db_path,
            log_dir,
            engine_config_path,
        }
    }

    /// Tuning from `ENGINE_CONFIG_PATH`, or the built-in defaults.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        match &self.engine_config_path {
            Some(path) => EngineConfig::from_file(path),
            None => Ok(EngineConfig::default()),
        }
    }
}

/// File logging is opt-in through `ENABLE_FILE_LOGS`; `LOG_DIR` defaults to `./logs`.
fn resolve_log_dir(enabled: Option<&str>, dir: Option<&str>) -> Option<PathBuf> {
    let enabled = enabled
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false);
    if !enabled {
        return None;
    }
    let dir = dir.map(str::trim).filter(|value| !value.is_empty()).unwrap_or("./logs");
    Some(PathBuf::from(dir))
}
