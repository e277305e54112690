//! RPC client for communicating with Ethereum execution nodes.

pub mod client;
pub mod types;

// Re-export main types
pub use client::{ChainClient, RpcClient};
pub use types::{Block, StructLog, Trace, Transaction};
