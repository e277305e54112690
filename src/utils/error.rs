//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during RPC communication
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Block not found: {0}")]
    BlockNotFound(u64),

    #[error("Method not supported by this RPC endpoint: {0}")]
    MethodNotSupported(String),
}

/// Errors that can occur while opening, writing or reading the record stream
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("output file '{}' already exists, choose another or pass --overwrite", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Malformed record on line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while validating collector arguments
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RPC URL cannot be empty")]
    EmptyUrl,

    #[error("RPC URL must start with http:// or https://")]
    UnsupportedScheme,

    #[error("concurrency is too large (max {max}, got {got})")]
    ConcurrencyTooLarge { max: usize, got: usize },

    #[error("channel capacity must be greater than 0")]
    ZeroChannelCapacity,

    #[error("timeout must be greater than 0 seconds")]
    ZeroTimeout,
}
