//! Cache over one namespace of a backing store

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::shaping::{decode_value, encode_value, store_key};
use super::store::KeyValueStore;
use crate::domain::DomainError;

/// A value found in the cache, possibly a cached null
///
/// `get` returns `None` for a missing entry and `Some(CachedValue)` for a
/// present one, so a stored null stays distinguishable from a miss.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue<V>(Option<V>);

impl<V> CachedValue<V> {
    pub fn new(value: Option<V>) -> Self {
        Self(value)
    }

    pub fn get(&self) -> Option<&V> {
        self.0.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn into_inner(self) -> Option<V> {
        self.0
    }
}

/// Named cache region backed by a [`KeyValueStore`]
///
/// Keys are usually produced by a [`KeyGenerator`](super::KeyGenerator); a
/// `None` key and `None` values are accepted and shaped into sentinels before
/// reaching the store. Every operation delegates directly to the store and
/// surfaces its errors unchanged.
#[derive(Clone)]
pub struct NamespacedCache {
    name: String,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for NamespacedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedCache")
            .field("name", &self.name)
            .field("store", &"<KeyValueStore>")
            .finish()
    }
}

impl NamespacedCache {
    pub fn new(name: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a typed value
    ///
    /// Returns `None` when no entry exists and a null [`CachedValue`] when
    /// a null was stored.
    pub async fn get<V>(&self, key: Option<&str>) -> Result<Option<CachedValue<V>>, DomainError>
    where
        V: DeserializeOwned,
    {
        let key = store_key(key);

        match self.store.get(&self.name, key).await? {
            Some(raw) => {
                debug!(namespace = %self.name, key = %key.escape_debug(), "Cache hit");
                Ok(Some(CachedValue(decode_value(&raw)?)))
            }
            None => {
                debug!(namespace = %self.name, key = %key.escape_debug(), "Cache miss");
                Ok(None)
            }
        }
    }

    /// Stores a value, overwriting any previous entry
    pub async fn put<V>(&self, key: Option<&str>, value: Option<&V>) -> Result<(), DomainError>
    where
        V: Serialize + ?Sized,
    {
        let key = store_key(key);
        let raw = encode_value(value)?;

        self.store.put(&self.name, key, &raw).await?;

        debug!(
            namespace = %self.name,
            key = %key.escape_debug(),
            null_value = value.is_none(),
            "Cached value"
        );
        Ok(())
    }

    /// Stores a value unless the key is already present
    ///
    /// Returns `None` when the value was stored, or the existing entry.
    pub async fn put_if_absent<V>(
        &self,
        key: Option<&str>,
        value: Option<&V>,
    ) -> Result<Option<CachedValue<V>>, DomainError>
    where
        V: Serialize + DeserializeOwned,
    {
        let shaped = store_key(key);
        let raw = encode_value(value)?;

        // The existing entry can vanish between the conditional store and the
        // read-back, in which case the store is attempted again.
        loop {
            if self.store.put_if_absent(&self.name, shaped, &raw).await? {
                debug!(
                    namespace = %self.name,
                    key = %shaped.escape_debug(),
                    "Cached absent value"
                );
                return Ok(None);
            }

            if let Some(existing) = self.get(key).await? {
                return Ok(Some(existing));
            }

            debug!(
                namespace = %self.name,
                key = %shaped.escape_debug(),
                "Existing entry vanished before read-back, retrying"
            );
        }
    }

    /// Returns the cached value, loading and caching it on a miss
    ///
    /// The loader runs only on a miss. Its result, including a null, is
    /// stored before being returned; a loader error is returned and nothing
    /// is stored.
    pub async fn get_or_load<V, F, Fut>(
        &self,
        key: Option<&str>,
        loader: F,
    ) -> Result<Option<V>, DomainError>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, DomainError>>,
    {
        if let Some(cached) = self.get::<V>(key).await? {
            return Ok(cached.into_inner());
        }

        let loaded = loader().await?;
        self.put(key, loaded.as_ref()).await?;

        Ok(loaded)
    }

    /// Removes an entry; a missing entry is not an error
    pub async fn evict(&self, key: Option<&str>) -> Result<(), DomainError> {
        let key = store_key(key);
        let existed = self.store.delete(&self.name, key).await?;

        debug!(namespace = %self.name, key = %key.escape_debug(), existed, "Evicted entry");
        Ok(())
    }

    /// Removes every entry of this namespace, leaving other namespaces intact
    pub async fn clear(&self) -> Result<(), DomainError> {
        self.store.clear_namespace(&self.name).await?;

        info!(namespace = %self.name, "Cleared cache namespace");
        Ok(())
    }
}
