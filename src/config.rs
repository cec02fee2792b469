//! Configuration management for DealerLedger

use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

fn default_db_path() -> String {
    "./dealerledger.db".to_string()
}

/// Load `config.toml` from the working directory, falling back to defaults
/// when it is absent. Failures are returned to the host process, never
/// panicked.
pub fn load_config() -> Result<Config> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config { database: DatabaseConfig::default() }
    } else {
        toml::from_str(&config_str)
            .map_err(|e| LedgerError::Serialization(format!("Failed to parse config.toml: {}", e)))?
    };

    if config.database.path.is_empty() {
        return Err(LedgerError::InvalidArgument(
            "database.path must be set in config.toml".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.path, "./dealerledger.db");
    }

    #[test]
    fn test_explicit_path_wins() {
        let config: Config = toml::from_str("[database]\npath = \"/tmp/ledger.db\"\n").unwrap();
        assert_eq!(config.database.path, "/tmp/ledger.db");
    }
}
