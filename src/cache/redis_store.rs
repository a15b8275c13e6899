//! Redis Store Module
//!
//! Remote key-value backend speaking the Redis protocol. Expiry is native
//! (`SETEX`), so no sweep is needed.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::KeyValueStore;
use crate::error::AdapterError;

impl From<redis::RedisError> for AdapterError {
    fn from(err: redis::RedisError) -> Self {
        AdapterError::Transport(err.to_string())
    }
}

// == Redis Store ==
/// One managed connection shared for the process lifetime.
pub struct RedisStore {
    conn: RwLock<Option<ConnectionManager>>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Opens the connection described by `url`.
    pub async fn connect(url: &str) -> Result<Self, AdapterError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        info!("Connected to key-value store");
        Ok(Self {
            conn: RwLock::new(Some(manager)),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, AdapterError> {
        // ConnectionManager clones share the multiplexed connection
        self.conn.read().await.clone().ok_or(AdapterError::Closed)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AdapterError> {
        let mut conn = self.connection().await?;
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl_seconds: Option<u64>,
    ) -> Result<(), AdapterError> {
        let mut conn = self.connection().await?;
        match ttl_seconds {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), AdapterError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, AdapterError> {
        let mut conn = self.connection().await?;
        Ok(conn.exists::<_, bool>(key).await?)
    }

    async fn close(&self) -> Result<(), AdapterError> {
        if self.conn.write().await.take().is_some() {
            debug!("Released key-value store connection");
        }
        Ok(())
    }
}
