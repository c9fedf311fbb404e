//! Redis store implementation

use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::KeyValueStore;
use crate::domain::DomainError;

/// Prefix used when none is configured, keeping namespace hashes off bare keys
pub const DEFAULT_KEY_PREFIX: &str = "argcache";

/// Configuration for Redis store
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Prefix placed before every namespace hash key
    pub key_prefix: Option<String>,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: Some(DEFAULT_KEY_PREFIX.to_string()),
        }
    }
}

impl RedisStoreConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Redis store implementation
///
/// Each namespace is one Redis hash, so entries are hash fields and clearing
/// a namespace is a single `DEL` of that hash.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisStore {
    /// Creates a new Redis store connection
    pub async fn new(config: RedisStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::store(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::store(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn namespace_key(&self, namespace: &str) -> String {
        hash_key(self.config.key_prefix.as_deref(), namespace)
    }
}

fn hash_key(prefix: Option<&str>, namespace: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, namespace),
        None => namespace.to_string(),
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, DomainError> {
        let hash = self.namespace_key(namespace);
        let mut conn = self.connection.clone();

        let result: Option<String> = conn.hget(&hash, key).await.map_err(|e| {
            DomainError::store(format!("Failed to get '{}' from '{}': {}", key, hash, e))
        })?;

        Ok(result)
    }

    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), DomainError> {
        let hash = self.namespace_key(namespace);
        let mut conn = self.connection.clone();

        let _: () = conn.hset(&hash, key, value).await.map_err(|e| {
            DomainError::store(format!("Failed to set '{}' in '{}': {}", key, hash, e))
        })?;

        Ok(())
    }

    async fn put_if_absent(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<bool, DomainError> {
        let hash = self.namespace_key(namespace);
        let mut conn = self.connection.clone();

        // HSETNX is atomic on the server
        let stored: bool = conn.hset_nx(&hash, key, value).await.map_err(|e| {
            DomainError::store(format!("Failed to set_nx '{}' in '{}': {}", key, hash, e))
        })?;

        Ok(stored)
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<bool, DomainError> {
        let hash = self.namespace_key(namespace);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.hdel(&hash, key).await.map_err(|e| {
            DomainError::store(format!("Failed to delete '{}' from '{}': {}", key, hash, e))
        })?;

        Ok(deleted > 0)
    }

    async fn clear_namespace(&self, namespace: &str) -> Result<(), DomainError> {
        let hash = self.namespace_key(namespace);
        let mut conn = self.connection.clone();

        let _: i32 = conn
            .del(&hash)
            .await
            .map_err(|e| DomainError::store(format!("Failed to clear '{}': {}", hash, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require a running Redis instance
    // Run with: cargo test -- --ignored

    fn get_test_config() -> RedisStoreConfig {
        RedisStoreConfig::new("redis://127.0.0.1:6379").with_key_prefix("argcache-test")
    }

    #[test]
    fn test_hash_key() {
        assert_eq!(hash_key(Some("myapp"), "default"), "myapp:default");
        assert_eq!(hash_key(None, "default"), "default");
    }

    #[test]
    fn test_default_key_prefix() {
        let config = RedisStoreConfig::new("redis://localhost");

        assert_eq!(config.key_prefix.as_deref(), Some(DEFAULT_KEY_PREFIX));
        assert_eq!(
            hash_key(config.key_prefix.as_deref(), "default"),
            "argcache:default"
        );
    }

    #[test]
    fn test_key_prefix() {
        let config = RedisStoreConfig::new("redis://localhost").with_key_prefix("myapp");

        assert_eq!(config.key_prefix, Some("myapp".to_string()));
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_put_and_get() {
        let store = RedisStore::new(get_test_config()).await.unwrap();

        store.put("default", "key1", "\"value1\"").await.unwrap();

        let result = store.get("default", "key1").await.unwrap();
        assert_eq!(result, Some("\"value1\"".to_string()));

        // Cleanup
        store.clear_namespace("default").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete() {
        let store = RedisStore::new(get_test_config()).await.unwrap();

        store.put("default", "key1", "1").await.unwrap();

        assert!(store.delete("default", "key1").await.unwrap());
        assert!(!store.delete("default", "key1").await.unwrap());
        assert!(store.get("default", "key1").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_put_if_absent() {
        let store = RedisStore::new(get_test_config()).await.unwrap();
        store.clear_namespace("nx").await.unwrap();

        assert!(store.put_if_absent("nx", "key", "1").await.unwrap());
        assert!(!store.put_if_absent("nx", "key", "2").await.unwrap());

        // Cleanup
        store.clear_namespace("nx").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_clear_namespace_is_scoped() {
        let store = RedisStore::new(get_test_config()).await.unwrap();

        store.put("cache1", "foo1", "1").await.unwrap();
        store.put("cache2", "foo2", "2").await.unwrap();

        store.clear_namespace("cache2").await.unwrap();

        assert!(store.get("cache1", "foo1").await.unwrap().is_some());
        assert!(store.get("cache2", "foo2").await.unwrap().is_none());

        // Cleanup
        store.clear_namespace("cache1").await.unwrap();
    }
}
