//! Types for JSON-RPC communication with an Ethereum execution node.
//!
//! Based on the Ethereum JSON-RPC spec and geth's struct-logger output for
//! `debug_traceTransaction`.

use crate::utils::error::RpcError;
use serde::{Deserialize, Deserializer, Serialize};

/// JSON-RPC 2.0 request structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: serde_json::Value,
    pub id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(method: &'a str, params: serde_json::Value, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 response structure
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// A block as returned by `eth_getBlockByNumber(n, true)`
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    #[serde(deserialize_with = "deserialize_quantity")]
    pub number: u64,

    /// Full transaction objects, in block order
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Transaction fields the collector needs
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub hash: String,

    /// Recipient; `None` for contract creation
    #[serde(default)]
    pub to: Option<String>,
}

impl Transaction {
    pub fn new(hash: impl Into<String>, to: Option<&str>) -> Self {
        Self {
            hash: hash.into(),
            to: to.map(str::to_string),
        }
    }
}

/// Struct-logger trace of a single transaction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trace {
    /// The transaction reverted; its steps are still counted
    #[serde(default)]
    pub failed: bool,

    #[serde(default, rename = "structLogs", alias = "struct_logs")]
    pub struct_logs: Vec<StructLog>,
}

impl Trace {
    /// Build a trace from a list of opcode names (mostly useful in tests)
    pub fn from_ops<S: AsRef<str>>(ops: &[S]) -> Self {
        Self {
            failed: false,
            struct_logs: ops.iter().map(|op| StructLog::new(op.as_ref())).collect(),
        }
    }
}

/// One execution step of a struct-logger trace
#[derive(Debug, Clone, Deserialize)]
pub struct StructLog {
    pub op: String,
}

impl StructLog {
    pub fn new(op: impl Into<String>) -> Self {
        Self { op: op.into() }
    }
}

/// Parse a hex-encoded JSON-RPC quantity (e.g. "0x1b4")
pub fn parse_quantity(value: &str) -> Result<u64, RpcError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| RpcError::InvalidResponse(format!("quantity without 0x prefix: {}", value)))?;

    if digits.is_empty() {
        return Err(RpcError::InvalidResponse("empty quantity".to_string()));
    }

    u64::from_str_radix(digits, 16)
        .map_err(|e| RpcError::InvalidResponse(format!("invalid quantity {}: {}", value, e)))
}

/// Encode a block number as a JSON-RPC quantity
pub fn to_quantity(value: u64) -> String {
    format!("{:#x}", value)
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_quantity(&raw).map_err(serde::de::Error::custom)
}
