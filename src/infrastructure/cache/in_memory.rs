//! In-memory store implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::KeyValueStore;
use crate::domain::DomainError;

/// Configuration for in-memory store
#[derive(Debug, Clone)]
pub struct InMemoryStoreConfig {
    /// Maximum number of entries across all namespaces
    pub max_capacity: u64,
    /// Time to live for every entry
    pub time_to_live: Option<Duration>,
    /// Time to idle - entries not accessed for this duration are evicted
    pub time_to_idle: Option<Duration>,
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live: None,
            time_to_idle: None,
        }
    }
}

impl InMemoryStoreConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    pub fn with_time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = Some(tti);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    namespace: String,
    key: String,
}

impl EntryKey {
    fn new(namespace: &str, key: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }
}

/// Thread-safe in-process store using moka
///
/// All namespaces share one bounded moka cache keyed by `(namespace, key)`.
/// Clearing a namespace registers an invalidation predicate, which applies
/// only to entries that exist when it is registered and never touches other
/// namespaces.
#[derive(Debug)]
pub struct InMemoryStore {
    entries: MokaCache<EntryKey, String>,
    config: InMemoryStoreConfig,
}

impl InMemoryStore {
    /// Creates a new in-memory store with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryStoreConfig::default())
    }

    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        let mut builder = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .support_invalidation_closures();

        if let Some(ttl) = config.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        Self {
            entries: builder.build(),
            config,
        }
    }

    pub fn config(&self) -> &InMemoryStoreConfig {
        &self.config
    }

    /// Approximate number of live entries across all namespaces
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.get(&EntryKey::new(namespace, key)).await)
    }

    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries
            .insert(EntryKey::new(namespace, key), value.to_string())
            .await;
        Ok(())
    }

    async fn put_if_absent(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<bool, DomainError> {
        let entry = self
            .entries
            .entry(EntryKey::new(namespace, key))
            .or_insert(value.to_string())
            .await;

        Ok(entry.is_fresh())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<bool, DomainError> {
        Ok(self
            .entries
            .remove(&EntryKey::new(namespace, key))
            .await
            .is_some())
    }

    async fn clear_namespace(&self, namespace: &str) -> Result<(), DomainError> {
        let namespace = namespace.to_string();

        self.entries
            .invalidate_entries_if(move |entry_key, _| entry_key.namespace == namespace)
            .map_err(|e| DomainError::store(format!("Failed to clear namespace: {:?}", e)))?;

        Ok(())
    }
}
