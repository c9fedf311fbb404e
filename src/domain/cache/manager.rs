//! Lazily created namespaced caches

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::key::{ArgumentKeyGenerator, KeyGenerator};
use super::namespaced::NamespacedCache;
use super::store::KeyValueStore;
use crate::domain::DomainError;

/// Hands out one [`NamespacedCache`] per name, creating it on first access
///
/// Creation happens under the write lock, so concurrent first calls for the
/// same name observe a single instance. The manager also carries the key
/// generator callers should use with its caches.
pub struct CacheManager {
    store: Arc<dyn KeyValueStore>,
    key_generator: Arc<dyn KeyGenerator>,
    caches: RwLock<HashMap<String, Arc<NamespacedCache>>>,
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("key_generator", &self.key_generator)
            .field("caches", &self.cache_names())
            .finish()
    }
}

impl CacheManager {
    /// Creates a manager using the default argument key generator
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key_generator: Arc::new(ArgumentKeyGenerator::default()),
            caches: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the key generator
    pub fn with_generator(mut self, key_generator: Arc<dyn KeyGenerator>) -> Self {
        self.key_generator = key_generator;
        self
    }

    pub fn key_generator(&self) -> Arc<dyn KeyGenerator> {
        self.key_generator.clone()
    }

    /// Returns the cache for `name`, creating it if this is the first access
    pub fn get_cache(&self, name: &str) -> Arc<NamespacedCache> {
        if let Some(cache) = self
            .caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return cache.clone();
        }

        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);

        caches
            .entry(name.to_string())
            .or_insert_with(|| {
                info!(namespace = %name, "Created cache");
                Arc::new(NamespacedCache::new(name, self.store.clone()))
            })
            .clone()
    }

    /// Names of every cache created so far
    pub fn cache_names(&self) -> BTreeSet<String> {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Clears every cache created so far
    pub async fn clear_all(&self) -> Result<(), DomainError> {
        let caches: Vec<Arc<NamespacedCache>> = self
            .caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for cache in caches {
            cache.clear().await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::store::stub::StubStore;
    use crate::domain::cache::Argument;
    use std::any::Any;
    use std::fmt::Display;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Foo {
        id: u64,
        name: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct FooKey(u64);

    impl Display for FooKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    fn manager() -> CacheManager {
        CacheManager::new(Arc::new(StubStore::new()))
    }

    #[test]
    fn test_no_caches_initially() {
        assert!(manager().cache_names().is_empty());
    }

    #[test]
    fn test_get_cache_is_idempotent() {
        let manager = manager();

        let first = manager.get_cache("x");
        let second = manager.get_cache("x");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.cache_names().len(), 1);
    }

    #[test]
    fn test_cache_names_lists_created_caches() {
        let manager = manager();
        manager.get_cache("default");
        manager.get_cache("objectKey");
        manager.get_cache("default");

        let names: Vec<String> = manager.cache_names().into_iter().collect();
        assert_eq!(names, vec!["default".to_string(), "objectKey".to_string()]);
    }

    #[tokio::test]
    async fn test_handles_share_namespace() {
        let manager = manager();

        manager
            .get_cache("x")
            .put(Some("k"), Some("v"))
            .await
            .unwrap();

        let value = manager.get_cache("x").get::<String>(Some("k")).await.unwrap();
        assert_eq!(value.and_then(|v| v.into_inner()), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_lazily_created_cache_is_usable() {
        let store = Arc::new(StubStore::new());
        let manager = CacheManager::new(store.clone());

        let lazy = manager.get_cache("other");
        lazy.put(
            Some("bar"),
            Some(&Foo {
                id: 1,
                name: "bar".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(store.raw("other", "bar").is_some());
    }

    #[tokio::test]
    async fn test_concurrent_first_access_creates_one_cache() {
        let manager = Arc::new(manager());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_cache("contended") })
            })
            .collect();

        let caches = futures::future::try_join_all(handles).await.unwrap();

        for cache in &caches {
            assert!(Arc::ptr_eq(cache, &caches[0]));
        }
        assert_eq!(manager.cache_names().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = Arc::new(StubStore::new());
        let manager = CacheManager::new(store.clone());

        manager.get_cache("a").put(Some("k"), Some(&1u8)).await.unwrap();
        manager.get_cache("b").put(Some("k"), Some(&2u8)).await.unwrap();

        manager.clear_all().await.unwrap();

        assert_eq!(store.len(), 0);
        assert_eq!(manager.cache_names().len(), 2);
    }

    #[tokio::test]
    async fn test_object_key_scenario() {
        let manager = manager();
        let generator = manager.key_generator();

        let key = FooKey(123);
        let target: &dyn Any = &();
        let generated = generator
            .generate(target, "getFooByKey", &[Argument::of(&key)])
            .unwrap();
        assert_eq!(generated, "123");

        let foo = Foo {
            id: 123,
            name: "foo".to_string(),
        };
        let cache = manager.get_cache("objectKey");
        cache.put(Some(generated.as_str()), Some(&foo)).await.unwrap();

        let cached = cache.get::<Foo>(Some("123")).await.unwrap();
        assert_eq!(cached.and_then(|v| v.into_inner()), Some(foo));
    }

    #[test]
    fn test_with_generator() {
        let registry = Arc::new(crate::domain::cache::StrategyRegistry::new());
        registry.register::<FooKey, _>(|key| Ok(format!("foo:{}", key.0)));

        let manager = manager().with_generator(Arc::new(ArgumentKeyGenerator::new(registry)));
        let key = FooKey(1);

        let generated = manager
            .key_generator()
            .generate(&(), "get", &[Argument::of(&key)])
            .unwrap();
        assert_eq!(generated, "foo:1");
    }
}
