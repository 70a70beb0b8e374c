//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Error types
//!
//! All error types are defined with thiserror.

use thiserror::Error;

/// bfguard error type
#[derive(Error, Debug)]
pub enum BfGuardError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Storage failure, surfaced unmodified from the backend
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    /// Cipher usage error
    #[error("cipher error: {0}")]
    CipherError(#[from] CipherError),

    /// Address could not be parsed
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Too many attempts inside the lockout window
    #[error("maximum delay reached: {attempts} attempts for action '{action}'")]
    MaxDelayReached { action: String, attempts: u64 },

    /// IO error
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// YAML parse error
    #[error("yaml error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parse error
    #[error("toml error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Storage error
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Connection failure
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// Query failure
    #[error("query error: {0}")]
    QueryError(String),

    /// Timeout
    #[error("timeout: {0}")]
    TimeoutError(String),

    /// Not found
    #[error("not found: {0}")]
    NotFound(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StorageError::QueryError(db_err.to_string()),
            sqlx::Error::PoolTimedOut => {
                StorageError::TimeoutError("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => {
                StorageError::ConnectionError("connection pool closed".to_string())
            }
            sqlx::Error::RowNotFound => StorageError::NotFound("row not found".to_string()),
            _ => StorageError::QueryError(err.to_string()),
        }
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            StorageError::TimeoutError(err.to_string())
        } else if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
            StorageError::ConnectionError(err.to_string())
        } else {
            StorageError::QueryError(err.to_string())
        }
    }
}

/// Cipher error
///
/// Both variants are caller errors: they are reported immediately and never
/// retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Key is empty or longer than 56 bytes
    #[error("key must be between 1 and 56 bytes, got {len}")]
    InvalidKey { len: usize },

    /// Input could not be interpreted as ciphertext
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
