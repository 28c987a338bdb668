//! Remote hash store abstraction.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt::Display;
use warden_error::{StoreError, StoreErrorKind, StoreResult};

/// A store organised as `hash → field → value`.
///
/// Every method is exactly one command and one response. Nothing is pipelined
/// and sequences of calls are not atomic: use [`set_if_absent`](Self::set_if_absent)
/// instead of `exists` followed by `set`.
///
/// A missing field is a normal outcome (`None`, `false`, an empty map), never an
/// error. Errors mean the store could not answer.
///
/// Values are stored as JSON text, so a field holding `""` and a field that was
/// never written are told apart.
///
/// # Example
///
/// ```
/// use warden_cache::{HashStore, MemoryHashStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prefixes: MemoryHashStore<&str, u64, String> = MemoryHashStore::new();
///
/// prefixes.set(&"prefixes", &411804307302776833, &"!".to_string()).await?;
/// assert_eq!(prefixes.get(&"prefixes", &411804307302776833).await?, Some("!".to_string()));
/// assert_eq!(prefixes.get(&"prefixes", &1).await?, None);
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait HashStore<H, F, V>: Send + Sync
where
    H: Display + Send + Sync,
    F: Display + Send + Sync,
    V: Serialize + DeserializeOwned + Send + Sync,
{
    /// Write a field, overwriting any previous value (`HSET`).
    async fn set(&self, hash: &H, field: &F, value: &V) -> StoreResult<()>;

    /// Write a field only if it does not exist yet (`HSETNX`).
    ///
    /// Returns whether the write happened.
    async fn set_if_absent(&self, hash: &H, field: &F, value: &V) -> StoreResult<bool>;

    /// Read a field (`HGET`). `None` means the field is not stored.
    async fn get(&self, hash: &H, field: &F) -> StoreResult<Option<V>>;

    /// Whether a field is stored (`HEXISTS`).
    async fn exists(&self, hash: &H, field: &F) -> StoreResult<bool>;

    /// Number of fields in a hash (`HLEN`).
    async fn length(&self, hash: &H) -> StoreResult<usize>;

    /// Every field/value pair of a hash (`HGETALL`), empty if none.
    async fn all(&self, hash: &H) -> StoreResult<BTreeMap<String, V>>;

    /// Every value of a hash (`HVALS`), empty if none.
    async fn values(&self, hash: &H) -> StoreResult<Vec<V>>;

    /// Delete one field (`HDEL`). Deleting an absent field is not an error.
    async fn delete(&self, hash: &H, field: &F) -> StoreResult<()>;

    /// Delete a whole hash (`DEL`).
    ///
    /// Returns whether anything was removed; a missing hash is logged, not
    /// raised.
    async fn remove(&self, hash: &H) -> StoreResult<bool>;
}

/// Encode a value the way every store implementation writes it.
pub(crate) fn encode<V: Serialize>(value: &V) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| {
        StoreError::new(StoreErrorKind::Codec(format!(
            "Failed to encode value: {}",
            e
        )))
    })
}

/// Decode a stored value.
pub(crate) fn decode<V: DeserializeOwned>(raw: &str) -> StoreResult<V> {
    serde_json::from_str(raw).map_err(|e| {
        StoreError::new(StoreErrorKind::Codec(format!(
            "Failed to decode stored value {:?}: {}",
            raw, e
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_not_absent() {
        let raw = encode(&String::new()).unwrap();
        assert_eq!(raw, "\"\"");
        let back: String = decode(&raw).unwrap();
        assert_eq!(back, "");
    }

    #[test]
    fn test_decode_garbage_is_codec_error() {
        let err = decode::<u64>("not json").unwrap_err();
        assert!(matches!(err.kind, StoreErrorKind::Codec(_)));
    }
}
