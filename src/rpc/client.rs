//! HTTP client for communicating with an Ethereum node RPC endpoint.

use super::types::{to_quantity, Block, JsonRpcError, JsonRpcRequest, JsonRpcResponse, Trace};
use crate::utils::config::{
    DEFAULT_RPC_TIMEOUT, TRACE_DISABLE_STACK, TRACE_DISABLE_STORAGE, TRACE_ENABLE_MEMORY,
    TRACE_ENABLE_RETURN_DATA,
};
use crate::utils::error::RpcError;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Read access to a chain, as needed by the collector pipeline.
///
/// Implementations are shared by every worker thread, so they must be
/// usable concurrently through `&self`.
pub trait ChainClient: Send + Sync {
    /// Current head block number
    fn current_height(&self) -> Result<u64, RpcError>;

    /// Block at `number` with full transaction objects
    fn block_with_transactions(&self, number: u64) -> Result<Block, RpcError>;

    /// Struct-logger trace for a transaction.
    ///
    /// `Ok(None)` means the node has no trace for it; that is not an error.
    fn transaction_trace(&self, tx_hash: &str) -> Result<Option<Trace>, RpcError>;
}

/// Blocking JSON-RPC client
pub struct RpcClient {
    client: Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new RPC client with the default timeout
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, RpcError> {
        Self::with_timeout(rpc_url, DEFAULT_RPC_TIMEOUT)
    }

    /// Create a client with custom timeout
    pub fn with_timeout(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RpcError::RequestFailed)?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one JSON-RPC call. A `null` result comes back as `Ok(None)`.
    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(method, params, id);

        debug!("RPC request: {} {}", method, request.params);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .map_err(RpcError::RequestFailed)?;

        // Check HTTP status
        if !response.status().is_success() {
            let status = response.status();
            return Err(RpcError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                response.text().unwrap_or_default()
            )));
        }

        let rpc_response: JsonRpcResponse<T> =
            response.json().map_err(RpcError::RequestFailed)?;

        if let Some(error) = rpc_response.error {
            return Err(map_rpc_error(error, method));
        }

        Ok(rpc_response.result)
    }
}

impl ChainClient for RpcClient {
    fn current_height(&self) -> Result<u64, RpcError> {
        let raw: Option<String> = self.call("eth_blockNumber", serde_json::json!([]))?;
        let raw = raw.ok_or_else(|| RpcError::InvalidResponse("Missing result field".to_string()))?;
        super::types::parse_quantity(&raw)
    }

    fn block_with_transactions(&self, number: u64) -> Result<Block, RpcError> {
        let params = serde_json::json!([to_quantity(number), true]);
        self.call("eth_getBlockByNumber", params)?
            .ok_or(RpcError::BlockNotFound(number))
    }

    fn transaction_trace(&self, tx_hash: &str) -> Result<Option<Trace>, RpcError> {
        let params = serde_json::json!([
            normalize_tx_hash(tx_hash),
            {
                "disableStorage": TRACE_DISABLE_STORAGE,
                "disableStack": TRACE_DISABLE_STACK,
                "enableMemory": TRACE_ENABLE_MEMORY,
                "enableReturnData": TRACE_ENABLE_RETURN_DATA,
            }
        ]);
        self.call("debug_traceTransaction", params)
    }
}

/// Normalize transaction hash to include 0x prefix
pub fn normalize_tx_hash(tx_hash: &str) -> String {
    if tx_hash.starts_with("0x") {
        tx_hash.to_string()
    } else {
        format!("0x{}", tx_hash)
    }
}

/// Map JSON-RPC error to our error type
fn map_rpc_error(error: JsonRpcError, method: &str) -> RpcError {
    match error.code {
        -32601 => RpcError::MethodNotSupported(method.to_string()),
        code => RpcError::Rpc {
            code,
            message: error.message,
        },
    }
}
