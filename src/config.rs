//! Store configuration resolved from the environment.
//!
//! - `TIMELEDGER_BACKEND`: `json` (default) or `memory`.
//! - `TIMELEDGER_DATA_DIR`: directory for the JSON file backend;
//!   defaults to `timeledger/` under the platform data directory.

use std::path::PathBuf;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    JsonFile,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::JsonFile => "json",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "memory" => Some(Self::Memory),
            "json" => Some(Self::JsonFile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::JsonFile,
            data_dir: default_data_dir(),
        }
    }
}

impl StoreConfig {
    /// Resolve configuration from environment variables, falling back
    /// to defaults for anything unset.
    pub fn resolve() -> Result<Self, ConfigError> {
        let backend = parse_backend_env("TIMELEDGER_BACKEND", StoreBackend::JsonFile)?;
        let data_dir = match std::env::var("TIMELEDGER_DATA_DIR") {
            Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
            _ => default_data_dir(),
        };
        Ok(Self { backend, data_dir })
    }

    /// In-memory configuration for tests and ephemeral sessions.
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            data_dir: PathBuf::new(),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timeledger")
}

fn parse_backend_env(key: &'static str, default: StoreBackend) -> Result<StoreBackend, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(default);
            }
            StoreBackend::from_db_value(&trimmed.to_ascii_lowercase()).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key,
                    message: format!("expected 'memory' or 'json', got '{}'", trimmed),
                }
            })
        }
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreBackend, StoreConfig};

    #[test]
    fn backend_values_round_trip() {
        for backend in [StoreBackend::Memory, StoreBackend::JsonFile] {
            assert_eq!(StoreBackend::from_db_value(backend.as_str()), Some(backend));
        }
        assert_eq!(StoreBackend::from_db_value("sqlite"), None);
    }

    #[test]
    fn default_config_uses_json_backend() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::JsonFile);
        assert!(config.data_dir.ends_with("timeledger"));
    }

    #[test]
    fn in_memory_config_has_no_data_dir() {
        let config = StoreConfig::in_memory();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.data_dir, std::path::PathBuf::new());
    }
}
