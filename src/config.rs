use crate::domain::ExtraTvlToggleSet;
use crate::engine::DEFAULT_KEEP_COUNT;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub snapshot_path: String,
    /// Toggle set used when a request does not name its own.
    pub default_toggles: ExtraTvlToggleSet,
    pub pie_keep_count: usize,
    /// Chain categories whose views group children under parents.
    pub grouped_categories: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let snapshot_path = env_map
            .get("SNAPSHOT_PATH")
            .cloned()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("SNAPSHOT_PATH".to_string()))?;

        let default_toggles = ExtraTvlToggleSet::parse_enabled_list(
            env_map
                .get("EXTRA_TVLS_ENABLED")
                .map(|s| s.as_str())
                .unwrap_or(""),
        );

        let pie_keep_count = match env_map.get("PIE_KEEP_COUNT") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                ConfigError::InvalidValue(
                    "PIE_KEEP_COUNT".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?,
            None => DEFAULT_KEEP_COUNT,
        };

        let grouped_categories = parse_list(
            env_map
                .get("GROUPED_CATEGORIES")
                .map(|s| s.as_str())
                .unwrap_or("All,Non-EVM"),
        );

        Ok(Config {
            port,
            snapshot_path,
            default_toggles,
            pie_keep_count,
            grouped_categories,
        })
    }

    /// Whether chain views of `category` fold children into parents.
    pub fn groups_category(&self, category: &str) -> bool {
        self.grouped_categories.iter().any(|c| c == category)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("SNAPSHOT_PATH".to_string(), "/tmp/snapshot.json".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.pie_keep_count, 10);
        assert!(config.default_toggles.enabled_categories().is_empty());
        assert!(config.groups_category("All"));
        assert!(config.groups_category("Non-EVM"));
        assert!(!config.groups_category("EVM"));
    }

    #[test]
    fn test_missing_snapshot_path() {
        let mut env_map = setup_required_env();
        env_map.remove("SNAPSHOT_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "SNAPSHOT_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_keep_count() {
        let mut env_map = setup_required_env();
        env_map.insert("PIE_KEEP_COUNT".to_string(), "-1".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PIE_KEEP_COUNT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_enabled_toggles_and_groups() {
        let mut env_map = setup_required_env();
        env_map.insert("EXTRA_TVLS_ENABLED".to_string(), "staking, pool2".to_string());
        env_map.insert("GROUPED_CATEGORIES".to_string(), "EVM".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert!(config.default_toggles.is_enabled("staking"));
        assert!(config.default_toggles.is_enabled("pool2"));
        assert!(config.groups_category("EVM"));
        assert!(!config.groups_category("All"));
    }
}
