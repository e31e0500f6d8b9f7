//! Redis backend for [`RecordStore`].
//!
//! Enabled with the `redis` Cargo feature.
//!
//! Token → Redis key mapping:
//! ```text
//! abcdefghijkl  →  {key_prefix}abcdefghijkl
//! ```
//! Values are the raw JSON strings written by whatever provisions records.

use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};

use crate::store::RecordStore;
use crate::token::LookupToken;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Errors produced by [`RedisStore`].
#[derive(Debug, thiserror::Error)]
pub enum RedisStoreError {
    #[error("invalid Redis URL: {0}")]
    Url(#[source] redis::RedisError),

    #[error("Redis connection failed: {0}")]
    Connect(#[source] redis::RedisError),

    #[error("Redis command failed: {0}")]
    Command(#[source] redis::RedisError),
}

/// Configuration for [`RedisStore`].
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    pub url: String,
    pub key_prefix: String,
}

impl RedisStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: String::new(),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// [`RecordStore`] backed by a Redis string key per token.
///
/// Holds a [`ConnectionManager`], which reconnects on its own and is cheap
/// to clone per request.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Open the client and establish the managed connection.
    ///
    /// One retry, bounded connect timeout. Lookups are never retried;
    /// a failed command is reported to the caller as-is.
    pub async fn connect(config: RedisStoreConfig) -> Result<Self, RedisStoreError> {
        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(CONNECT_TIMEOUT);

        let client = Client::open(config.url.as_str()).map_err(RedisStoreError::Url)?;
        let conn = client
            .get_connection_manager_with_config(manager_config)
            .await
            .map_err(RedisStoreError::Connect)?;

        Ok(Self {
            conn,
            key_prefix: config.key_prefix,
        })
    }

    fn key(&self, token: &LookupToken) -> String {
        format!("{}{}", self.key_prefix, token.as_str())
    }
}

impl RecordStore for RedisStore {
    type Error = RedisStoreError;

    async fn get(&self, token: &LookupToken) -> Result<Option<String>, Self::Error> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(RedisStoreError::Command)
    }
}
