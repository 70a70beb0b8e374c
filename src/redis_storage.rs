//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Redis key-value cache
//!
//! [`Storage`] over a Redis `ConnectionManager` using `GET`, `SETEX`/`SET` and
//! `DEL`. Commands are issued once; failures surface as [`StorageError`].

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, error, info, trace};

use crate::error::StorageError;
use crate::storage::Storage;

const DEFAULT_REDIS_PORT: u16 = 6379;

/// Redis connection settings
#[derive(Clone)]
pub struct RedisConfig {
    /// `redis://host:port` address; credentials in the URL are ignored
    pub url: String,
    /// Database index
    pub db: i64,
    /// Password, kept secret
    pub password: Option<Secret<String>>,
    /// Connection establishment timeout
    pub connection_timeout: Duration,
    /// Prefix prepended to every key
    pub key_prefix: String,
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("url", &self.url)
            .field("db", &self.db)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connection_timeout", &self.connection_timeout)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            db: 0,
            password: None,
            connection_timeout: Duration::from_secs(5),
            key_prefix: "bfguard:".to_string(),
        }
    }
}

impl RedisConfig {
    /// Settings for `url` with defaults otherwise.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the database index.
    pub fn db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Secret::new(password.into()));
        self
    }

    /// Set the connection timeout.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the key prefix.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Build connection info, keeping the password out of the URL.
    fn connection_info(&self) -> Result<redis::ConnectionInfo, StorageError> {
        let (host, port) = parse_host_port(&self.url)?;
        Ok(redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(host, port),
            redis: redis::RedisConnectionInfo {
                db: self.db,
                username: None,
                password: self
                    .password
                    .as_ref()
                    .map(|p| p.expose_secret().clone()),
            },
        })
    }
}

/// Extract host and port from a `redis://[user@]host[:port][/db]` URL.
///
/// `rediss://` is refused: the connection is always plain TCP.
fn parse_host_port(url: &str) -> Result<(String, u16), StorageError> {
    if url.starts_with("rediss://") {
        return Err(StorageError::ConnectionError(format!(
            "TLS redis urls are not supported: {}",
            url
        )));
    }

    let rest = url.strip_prefix("redis://").unwrap_or(url);
    let rest = rest.rsplit_once('@').map_or(rest, |(_, host)| host);
    let rest = rest.split_once('/').map_or(rest, |(host, _)| host);

    let invalid_port =
        || StorageError::ConnectionError(format!("invalid port in redis url: {}", url));
    let parse_port = |port: &str| port.parse::<u16>().map_err(|_| invalid_port());

    let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
        let (host, tail) = bracketed.split_once(']').ok_or_else(|| {
            StorageError::ConnectionError(format!("unclosed bracket in redis url: {}", url))
        })?;
        let port = match tail {
            "" => DEFAULT_REDIS_PORT,
            _ => parse_port(tail.strip_prefix(':').ok_or_else(invalid_port)?)?,
        };
        (host, port)
    } else {
        match rest.split_once(':') {
            // A bare IPv6 address has several colons and no port.
            Some((_, tail)) if tail.contains(':') => (rest, DEFAULT_REDIS_PORT),
            Some((host, port)) => (host, parse_port(port)?),
            None => (rest, DEFAULT_REDIS_PORT),
        }
    };

    if host.is_empty() {
        return Err(StorageError::ConnectionError(format!(
            "missing host in redis url: {}",
            url
        )));
    }
    Ok((host.to_string(), port))
}

/// Redis-backed cache
#[derive(Clone)]
pub struct RedisStorage {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisStorage {
    /// Connect to Redis.
    pub async fn new(config: RedisConfig) -> Result<Self, StorageError> {
        info!("Connecting to Redis at {}", config.url);

        let client = Client::open(config.connection_info()?).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            StorageError::ConnectionError(format!("failed to create redis client: {}", e))
        })?;

        let conn = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                error!("Redis connection timed out");
                StorageError::TimeoutError(format!(
                    "redis connection exceeded {:?}",
                    config.connection_timeout
                ))
            })?
            .map_err(|e| {
                error!("Redis connection failed: {}", e);
                StorageError::from(e)
            })?;

        info!("Connected to Redis");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix,
        })
    }

    /// Check the server answers.
    pub async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = self.prefixed(key);
        let mut conn = self.conn.clone();
        let result: Option<String> = conn.get(&key).await.map_err(|e| {
            error!("Redis GET failed: {}", e);
            StorageError::from(e)
        })?;

        trace!("GET key={}, hit={}", key, result.is_some());
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), StorageError> {
        let key = self.prefixed(key);
        let mut conn = self.conn.clone();

        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(&key, value, ttl).await.map_err(|e| {
                    error!("Redis SETEX failed: {}", e);
                    StorageError::from(e)
                })?;
            }
            None => {
                let _: () = conn.set(&key, value).await.map_err(|e| {
                    error!("Redis SET failed: {}", e);
                    StorageError::from(e)
                })?;
            }
        }

        debug!("SET key={}, ttl={:?}", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let key = self.prefixed(key);
        let mut conn = self.conn.clone();
        let _: () = conn.del(&key).await.map_err(|e| {
            error!("Redis DEL failed: {}", e);
            StorageError::from(e)
        })?;

        debug!("DEL key={}", key);
        Ok(())
    }
}
