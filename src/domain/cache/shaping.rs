//! Null key and null value shaping at the store boundary
//!
//! Backing stores cannot hold a missing key or a missing value, so both are
//! replaced with reserved sentinels before reaching the store and mapped back
//! on the way out.
//!
//! Values are stored as `serde_json` output, which is always valid JSON.
//! [`NULL_VALUE_SENTINEL`] is not valid JSON, so it never collides with a real
//! value. [`NULL_KEY_SENTINEL`] is framed by NUL characters; a key generated
//! from `Display` output only reaches it if that output contains NULs. A caller
//! passing the sentinel text as a key addresses the null-key entry.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::DomainError;

/// Stored in place of a null key
pub const NULL_KEY_SENTINEL: &str = "\u{0}argcache:null-key\u{0}";

/// Stored in place of a null value
pub const NULL_VALUE_SENTINEL: &str = "~argcache:null-value~";

/// Maps an optional key to the key used in the store
pub fn store_key(key: Option<&str>) -> &str {
    key.unwrap_or(NULL_KEY_SENTINEL)
}

/// Serializes an optional value into its stored form
pub fn encode_value<V>(value: Option<&V>) -> Result<String, DomainError>
where
    V: Serialize + ?Sized,
{
    match value {
        Some(value) => serde_json::to_string(value).map_err(|e| {
            DomainError::serialization(format!("Failed to serialize cache value: {}", e))
        }),
        None => Ok(NULL_VALUE_SENTINEL.to_string()),
    }
}

/// Deserializes a stored value, mapping the sentinel back to `None`
pub fn decode_value<V>(raw: &str) -> Result<Option<V>, DomainError>
where
    V: DeserializeOwned,
{
    if raw == NULL_VALUE_SENTINEL {
        return Ok(None);
    }

    serde_json::from_str(raw).map(Some).map_err(|e| {
        DomainError::serialization(format!("Failed to deserialize cache value: {}", e))
    })
}
