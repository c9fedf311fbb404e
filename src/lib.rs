//! argcache
//!
//! Caches the results of method-like calls in a key-value store:
//! - Composite keys generated from ordered, heterogeneous call arguments
//! - Per-type key strategies with a `Display` fallback
//! - Namespaced caches with null key and null value support
//! - In-memory (moka) and Redis backing stores

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::cache::{
    Argument, ArgumentKeyGenerator, CacheManager, CachedValue, KeyGenerator, KeyValueStore,
    NamespacedCache, StrategyRegistry,
};
pub use domain::DomainError;

use infrastructure::cache::StoreFactory;
use tracing::info;

/// Create a cache manager over the store selected by configuration
pub async fn create_cache_manager(config: &AppConfig) -> anyhow::Result<CacheManager> {
    let store_config = config.store_config()?;
    let store = StoreFactory::new().create(&store_config).await?;

    info!(store_type = %store_config.store_type, "Cache manager ready");
    Ok(CacheManager::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_cache_manager_in_memory() {
        let manager = create_cache_manager(&AppConfig::default()).await.unwrap();
        let cache = manager.get_cache("default");

        assert!(cache.get::<String>(Some("key")).await.unwrap().is_none());

        cache.put(Some("key"), Some("foo")).await.unwrap();
        let cached = cache.get::<String>(Some("key")).await.unwrap();

        assert_eq!(cached.and_then(CachedValue::into_inner), Some("foo".to_string()));
    }
}
