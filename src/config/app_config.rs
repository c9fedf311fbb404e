use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::cache::{StoreConfig, StoreType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Backing store section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub ttl_secs: Option<u64>,
    pub max_capacity: Option<u64>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            ttl_secs: None,
            max_capacity: Some(10_000),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Converts the store section into a factory configuration
    pub fn store_config(&self) -> Result<StoreConfig, DomainError> {
        let store_type: StoreType = self.store.backend.parse()?;

        Ok(StoreConfig {
            store_type,
            redis_url: self.store.redis_url.clone(),
            key_prefix: self.store.key_prefix.clone(),
            time_to_live: self.store.ttl_secs.map(Duration::from_secs),
            max_capacity: self.store.max_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_config() {
        let store = AppConfig::default().store_config().unwrap();

        assert_eq!(store.store_type, StoreType::InMemory);
        assert_eq!(store.max_capacity, Some(10_000));
        assert!(store.time_to_live.is_none());
    }

    #[test]
    fn test_redis_store_config() {
        let mut config = AppConfig::default();
        config.store.backend = "redis".to_string();
        config.store.redis_url = Some("redis://cache:6379".to_string());
        config.store.key_prefix = Some("app".to_string());
        config.store.ttl_secs = Some(30);

        let store = config.store_config().unwrap();

        assert_eq!(store.store_type, StoreType::Redis);
        assert_eq!(store.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(store.key_prefix.as_deref(), Some("app"));
        assert_eq!(store.time_to_live, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unknown_backend() {
        let mut config = AppConfig::default();
        config.store.backend = "memcache".to_string();

        assert!(matches!(
            config.store_config(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial_document() {
        let source = config::Config::builder()
            .add_source(config::File::from_str(
                "[store]\nbackend = \"redis\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: AppConfig = source.try_deserialize().unwrap();

        assert_eq!(config.store.backend, "redis");
        assert_eq!(config.logging.level, "info");
    }
}
