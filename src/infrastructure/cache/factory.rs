//! Store factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::cache::KeyValueStore;
use crate::domain::DomainError;

use super::in_memory::{InMemoryStore, InMemoryStoreConfig};
use super::redis::{RedisStore, RedisStoreConfig};

/// Supported store types
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StoreType {
    /// In-process store using moka
    #[default]
    InMemory,
    /// Redis store
    Redis,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::InMemory => write!(f, "in_memory"),
            StoreType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(StoreType::InMemory),
            "redis" => Ok(StoreType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown store type: {}. Valid types: in_memory, redis",
                s
            ))),
        }
    }
}

/// Configuration for store factory
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Type of store to create
    pub store_type: StoreType,
    /// Redis URL (required for Redis type)
    pub redis_url: Option<String>,
    /// Key prefix for namespace hashes (Redis only, `argcache` when unset)
    pub key_prefix: Option<String>,
    /// Entry time-to-live (in-memory only)
    pub time_to_live: Option<Duration>,
    /// Maximum capacity (in-memory only)
    pub max_capacity: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::InMemory,
            redis_url: None,
            key_prefix: None,
            time_to_live: None,
            max_capacity: Some(10_000),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration for in-memory store
    pub fn in_memory() -> Self {
        Self {
            store_type: StoreType::InMemory,
            ..Default::default()
        }
    }

    /// Creates a new configuration for Redis store
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            store_type: StoreType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Creates config from environment variables
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_type = lookup("STORE_TYPE")
            .unwrap_or_else(|| "in_memory".to_string())
            .parse::<StoreType>()?;

        let time_to_live = lookup("STORE_TTL_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);

        let max_capacity = lookup("STORE_MAX_CAPACITY")
            .and_then(|v| v.parse().ok())
            .or(Self::default().max_capacity);

        Ok(Self {
            store_type,
            redis_url: lookup("REDIS_URL"),
            key_prefix: lookup("STORE_KEY_PREFIX"),
            time_to_live,
            max_capacity,
        })
    }
}

fn redis_config(config: &StoreConfig) -> Result<RedisStoreConfig, DomainError> {
    let url = config.redis_url.clone().ok_or_else(|| {
        DomainError::configuration("Redis URL is required for Redis store type")
    })?;

    if let Some(ttl) = config.time_to_live {
        warn!(
            ttl_secs = ttl.as_secs(),
            "Time to live is not supported by the Redis store and is ignored"
        );
    }

    let mut redis_config = RedisStoreConfig::new(url);

    if let Some(prefix) = &config.key_prefix {
        redis_config = redis_config.with_key_prefix(prefix.clone());
    }

    Ok(redis_config)
}

/// Factory for creating store instances
#[derive(Debug, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a store instance based on configuration
    pub async fn create(&self, config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, DomainError> {
        info!(store_type = %config.store_type, "Creating backing store");

        match config.store_type {
            StoreType::InMemory => {
                let mut in_memory_config = InMemoryStoreConfig::default();

                if let Some(capacity) = config.max_capacity {
                    in_memory_config = in_memory_config.with_max_capacity(capacity);
                }

                if let Some(ttl) = config.time_to_live {
                    in_memory_config = in_memory_config.with_time_to_live(ttl);
                }

                Ok(Arc::new(InMemoryStore::with_config(in_memory_config)))
            }
            StoreType::Redis => {
                let redis_config = redis_config(config)?;

                let store = RedisStore::new(redis_config).await?;
                Ok(Arc::new(store))
            }
        }
    }
}
