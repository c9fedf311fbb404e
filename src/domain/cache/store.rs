//! Backing key-value store trait

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Remote key-value store partitioned into namespaces
///
/// Keys and values arrive already shaped: null keys and null values have been
/// replaced by sentinels, values are serialized text. Implementations surface
/// their own failures as [`DomainError::Store`] and never retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the raw value stored under `key` in `namespace`
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value`, overwriting any previous entry
    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), DomainError>;

    /// Stores `value` only if the key is absent, returning whether it was stored
    async fn put_if_absent(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<bool, DomainError> {
        if self.get(namespace, key).await?.is_some() {
            Ok(false)
        } else {
            self.put(namespace, key, value).await?;
            Ok(true)
        }
    }

    /// Deletes an entry, returning whether one existed
    async fn delete(&self, namespace: &str, key: &str) -> Result<bool, DomainError>;

    /// Removes every entry of `namespace` in one scoped operation
    async fn clear_namespace(&self, namespace: &str) -> Result<(), DomainError>;
}
