use std::env;
use std::path::PathBuf;

use crate::error::BootstrapError;
use crate::models::RosterSnapshot;
use crate::services::seed_service;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://roster.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Server settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub seed_path: Option<PathBuf>,
    pub assets_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: non_empty("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            seed_path: non_empty("ROSTER_SEED_PATH").map(PathBuf::from),
            assets_dir: non_empty("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
        }
    }

    /// The configured seed file, or the built-in catalog.
    pub fn load_seed(&self) -> Result<RosterSnapshot, BootstrapError> {
        match &self.seed_path {
            Some(path) => seed_service::load_seed_file(path),
            None => Ok(seed_service::default_seed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.seed_path, None);
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
    }

    #[test]
    fn reads_overrides_and_ignores_bad_port() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOST", "0.0.0.0"),
            ("PORT", "not-a-port"),
            ("ROSTER_SEED_PATH", "seed/activities.json"),
        ]);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.seed_path, Some(PathBuf::from("seed/activities.json")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("DATABASE_URL", "  "), ("PORT", "8080")]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn builtin_seed_without_seed_path() {
        let seed = config_from(&[]).load_seed().unwrap();
        assert!(seed.contains_key("Chess Club"));
    }
}
