//! In-process hash store.

use crate::hash::{HashStore, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use warden_error::StoreResult;

type Hashes = HashMap<String, HashMap<String, String>>;

/// [`HashStore`] kept in process memory.
///
/// Behaves like [`RedisHashStore`](crate::RedisHashStore) without a server:
/// values are JSON-encoded, absence is `None`, and clones are handles onto the
/// same data the way clones of a remote client point at the same server. Each
/// operation takes the lock once, so single operations are atomic.
pub struct MemoryHashStore<H, F, V> {
    hashes: Arc<RwLock<Hashes>>,
    _types: PhantomData<fn() -> (H, F, V)>,
}

impl<H, F, V> MemoryHashStore<H, F, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            hashes: Arc::new(RwLock::new(HashMap::new())),
            _types: PhantomData,
        }
    }
}

impl<H, F, V> Default for MemoryHashStore<H, F, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, F, V> Clone for MemoryHashStore<H, F, V> {
    fn clone(&self) -> Self {
        Self {
            hashes: Arc::clone(&self.hashes),
            _types: PhantomData,
        }
    }
}

impl<H, F, V> fmt::Debug for MemoryHashStore<H, F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHashStore").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<H, F, V> HashStore<H, F, V> for MemoryHashStore<H, F, V>
where
    H: Display + Send + Sync,
    F: Display + Send + Sync,
    V: Serialize + DeserializeOwned + Send + Sync,
{
    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn set(&self, hash: &H, field: &F, value: &V) -> StoreResult<()> {
        let raw = encode(value)?;
        self.hashes
            .write()
            .await
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), raw);
        Ok(())
    }

    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn set_if_absent(&self, hash: &H, field: &F, value: &V) -> StoreResult<bool> {
        let raw = encode(value)?;
        let mut hashes = self.hashes.write().await;
        let fields = hashes.entry(hash.to_string()).or_default();
        let field = field.to_string();
        if fields.contains_key(&field) {
            debug!("Field already set, skipping write");
            return Ok(false);
        }
        fields.insert(field, raw);
        Ok(true)
    }

    async fn get(&self, hash: &H, field: &F) -> StoreResult<Option<V>> {
        let hashes = self.hashes.read().await;
        hashes
            .get(&hash.to_string())
            .and_then(|fields| fields.get(&field.to_string()))
            .map(|raw| decode(raw))
            .transpose()
    }

    async fn exists(&self, hash: &H, field: &F) -> StoreResult<bool> {
        let hashes = self.hashes.read().await;
        Ok(hashes
            .get(&hash.to_string())
            .is_some_and(|fields| fields.contains_key(&field.to_string())))
    }

    async fn length(&self, hash: &H) -> StoreResult<usize> {
        let hashes = self.hashes.read().await;
        Ok(hashes.get(&hash.to_string()).map_or(0, HashMap::len))
    }

    async fn all(&self, hash: &H) -> StoreResult<BTreeMap<String, V>> {
        let hashes = self.hashes.read().await;
        let Some(fields) = hashes.get(&hash.to_string()) else {
            return Ok(BTreeMap::new());
        };
        fields
            .iter()
            .map(|(field, raw)| decode(raw).map(|value| (field.clone(), value)))
            .collect()
    }

    async fn values(&self, hash: &H) -> StoreResult<Vec<V>> {
        let hashes = self.hashes.read().await;
        let Some(fields) = hashes.get(&hash.to_string()) else {
            return Ok(Vec::new());
        };
        fields.values().map(|raw| decode(raw)).collect()
    }

    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn delete(&self, hash: &H, field: &F) -> StoreResult<()> {
        let mut hashes = self.hashes.write().await;
        let key = hash.to_string();
        if let Some(fields) = hashes.get_mut(&key) {
            fields.remove(&field.to_string());
            // Redis drops a hash once its last field is gone.
            if fields.is_empty() {
                hashes.remove(&key);
            }
        }
        Ok(())
    }

    #[instrument(skip_all, fields(hash = %hash))]
    async fn remove(&self, hash: &H) -> StoreResult<bool> {
        let removed = self.hashes.write().await.remove(&hash.to_string()).is_some();
        if !removed {
            warn!("Hash does not exist, nothing removed");
        }
        Ok(removed)
    }
}
