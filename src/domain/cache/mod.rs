//! Cache domain - argument-derived keys and namespaced caches

mod argument;
mod key;
mod manager;
mod namespaced;
mod shaping;
mod store;
mod strategy;

pub use argument::{Argument, ArgumentValue};
pub use key::{ArgumentKeyGenerator, KeyGenerator, KEY_SEPARATOR};
pub use manager::CacheManager;
pub use namespaced::{CachedValue, NamespacedCache};
pub use shaping::{NULL_KEY_SENTINEL, NULL_VALUE_SENTINEL};
pub use store::KeyValueStore;
pub use strategy::{
    key_strategy, DefaultKeyStrategy, KeyStrategy, StrategyRegistration, StrategyRegistry,
};

#[cfg(test)]
pub use store::stub::StubStore;
