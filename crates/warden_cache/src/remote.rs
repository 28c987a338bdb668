//! Redis-backed hash store.

use crate::HashStoreConfig;
use crate::hash::{HashStore, decode, encode};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{Cmd, FromRedisValue, IntoConnectionInfo, RedisError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OnceCell, Semaphore};
use tracing::{debug, instrument, warn};
use warden_error::{StoreError, StoreErrorKind, StoreResult};

/// [`HashStore`] client for a Redis-compatible server.
///
/// The connection is opened on the first command (or by [`connect`](Self::connect))
/// and shared by every clone of the client. Cloning copies the handle and its
/// configuration, never remote data. At most `pool_size` commands are in flight
/// at once across all clones.
///
/// Transport failures are returned as `StoreErrorKind::Unavailable` and are not
/// retried here.
///
/// # Example
///
/// ```no_run
/// use warden_cache::{HashStore, HashStoreConfig, RedisHashStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mutes: RedisHashStore<&str, u64, u64> = RedisHashStore::new(HashStoreConfig::default())?;
/// mutes.set(&"mutes", &411804307302776833, &789614938247266305).await?;
/// let role = mutes.get(&"mutes", &411804307302776833).await?;
/// # Ok(())
/// # }
/// ```
pub struct RedisHashStore<H, F, V> {
    config: HashStoreConfig,
    client: redis::Client,
    manager: Arc<OnceCell<ConnectionManager>>,
    permits: Option<Arc<Semaphore>>,
    _types: PhantomData<fn() -> (H, F, V)>,
}

impl<H, F, V> RedisHashStore<H, F, V> {
    /// Create a client. No connection is made until the first command.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the host/port/database do not form a valid
    /// connection target.
    pub fn new(config: HashStoreConfig) -> StoreResult<Self> {
        let mut info = config.url().into_connection_info().map_err(|e| {
            StoreError::new(StoreErrorKind::InvalidConfig(format!(
                "{}: {}",
                config.url(),
                e
            )))
        })?;
        info.redis.password = config.password().clone();

        let client = redis::Client::open(info).map_err(|e| {
            StoreError::new(StoreErrorKind::InvalidConfig(e.to_string()))
        })?;

        let permits = match *config.pool_size() {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        debug!(
            url = %config.url(),
            pool_size = config.pool_size(),
            "Created Redis hash store client"
        );

        Ok(Self {
            config,
            client,
            manager: Arc::new(OnceCell::new()),
            permits,
            _types: PhantomData,
        })
    }

    /// Configuration this client was built from.
    pub fn config(&self) -> &HashStoreConfig {
        &self.config
    }

    /// Open the shared connection now instead of on the first command.
    #[instrument(skip(self), fields(url = %self.config.url()))]
    pub async fn connect(&self) -> StoreResult<()> {
        self.manager().await.map(|_| ())
    }

    async fn manager(&self) -> StoreResult<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                let settings = ConnectionManagerConfig::new()
                    .set_number_of_retries(0)
                    .set_connection_timeout(Duration::from_millis(
                        *self.config.connect_timeout_ms(),
                    ))
                    .set_response_timeout(Duration::from_millis(
                        *self.config.response_timeout_ms(),
                    ));
                debug!(url = %self.config.url(), "Connecting to Redis");
                ConnectionManager::new_with_config(self.client.clone(), settings)
                    .await
                    .map_err(|e| map_redis_error("CONNECT", e))
            })
            .await?;
        Ok(manager.clone())
    }

    /// Run one command and await its single reply.
    async fn query<T: FromRedisValue>(&self, name: &'static str, cmd: Cmd) -> StoreResult<T> {
        let _permit = match &self.permits {
            Some(permits) => Some(permits.acquire().await.map_err(|e| {
                StoreError::new(StoreErrorKind::Unavailable(format!(
                    "connection pool closed: {}",
                    e
                )))
            })?),
            None => None,
        };
        let mut conn = self.manager().await?;
        let reply: T = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error(name, e))?;
        Ok(reply)
    }
}

impl<H, F, V> Clone for RedisHashStore<H, F, V> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            client: self.client.clone(),
            manager: Arc::clone(&self.manager),
            permits: self.permits.clone(),
            _types: PhantomData,
        }
    }
}

impl<H, F, V> fmt::Debug for RedisHashStore<H, F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisHashStore")
            .field("url", &self.config.url())
            .field("connected", &self.manager.initialized())
            .finish()
    }
}

/// Sort a client error into the store taxonomy.
fn map_redis_error(command: &str, err: RedisError) -> StoreError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        warn!(command, error = %err, "Redis unreachable");
        StoreError::new(StoreErrorKind::Unavailable(err.to_string()))
    } else if err.kind() == redis::ErrorKind::TypeError {
        StoreError::new(StoreErrorKind::Codec(err.to_string()))
    } else {
        StoreError::new(StoreErrorKind::Command {
            command: command.to_string(),
            message: err.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl<H, F, V> HashStore<H, F, V> for RedisHashStore<H, F, V>
where
    H: Display + Send + Sync,
    F: Display + Send + Sync,
    V: Serialize + DeserializeOwned + Send + Sync,
{
    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn set(&self, hash: &H, field: &F, value: &V) -> StoreResult<()> {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(hash.to_string())
            .arg(field.to_string())
            .arg(encode(value)?);
        let _: i64 = self.query("HSET", cmd).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn set_if_absent(&self, hash: &H, field: &F, value: &V) -> StoreResult<bool> {
        let mut cmd = redis::cmd("HSETNX");
        cmd.arg(hash.to_string())
            .arg(field.to_string())
            .arg(encode(value)?);
        let written: i64 = self.query("HSETNX", cmd).await?;
        Ok(written == 1)
    }

    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn get(&self, hash: &H, field: &F) -> StoreResult<Option<V>> {
        let mut cmd = redis::cmd("HGET");
        cmd.arg(hash.to_string()).arg(field.to_string());
        let raw: Option<String> = self.query("HGET", cmd).await?;
        raw.as_deref().map(decode).transpose()
    }

    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn exists(&self, hash: &H, field: &F) -> StoreResult<bool> {
        let mut cmd = redis::cmd("HEXISTS");
        cmd.arg(hash.to_string()).arg(field.to_string());
        let found: i64 = self.query("HEXISTS", cmd).await?;
        Ok(found == 1)
    }

    #[instrument(skip_all, fields(hash = %hash))]
    async fn length(&self, hash: &H) -> StoreResult<usize> {
        let mut cmd = redis::cmd("HLEN");
        cmd.arg(hash.to_string());
        self.query("HLEN", cmd).await
    }

    #[instrument(skip_all, fields(hash = %hash))]
    async fn all(&self, hash: &H) -> StoreResult<BTreeMap<String, V>> {
        let mut cmd = redis::cmd("HGETALL");
        cmd.arg(hash.to_string());
        let raw: HashMap<String, String> = self.query("HGETALL", cmd).await?;
        raw.into_iter()
            .map(|(field, value)| decode(&value).map(|value| (field, value)))
            .collect()
    }

    #[instrument(skip_all, fields(hash = %hash))]
    async fn values(&self, hash: &H) -> StoreResult<Vec<V>> {
        let mut cmd = redis::cmd("HVALS");
        cmd.arg(hash.to_string());
        let raw: Vec<String> = self.query("HVALS", cmd).await?;
        raw.iter().map(|value| decode(value)).collect()
    }

    #[instrument(skip_all, fields(hash = %hash, field = %field))]
    async fn delete(&self, hash: &H, field: &F) -> StoreResult<()> {
        let mut cmd = redis::cmd("HDEL");
        cmd.arg(hash.to_string()).arg(field.to_string());
        let removed: i64 = self.query("HDEL", cmd).await?;
        debug!(removed, "Deleted field");
        Ok(())
    }

    #[instrument(skip_all, fields(hash = %hash))]
    async fn remove(&self, hash: &H) -> StoreResult<bool> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(hash.to_string());
        let removed: i64 = self.query("DEL", cmd).await?;
        if removed != 1 {
            warn!(removed, "Hash does not exist, nothing removed");
            return Ok(false);
        }
        Ok(true)
    }
}
