//! Output record definition.
//!
//! One record per traced transaction, written as a single JSON line:
//! `{"block":100,"tx":0,"hash":"0x..","contract":"0x..","data":{"PUSH1":3}}`

use crate::aggregator::OpcodeHistogram;
use serde::{Deserialize, Serialize};

/// Opcode histogram of one transaction
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Block the transaction was included in
    pub block: u64,

    /// Zero-based position of the transaction within the block
    #[serde(rename = "tx")]
    pub tx_index: usize,

    /// Transaction hash
    pub hash: String,

    /// Recipient contract address
    pub contract: String,

    /// Opcode name -> execution count
    #[serde(rename = "data")]
    pub opcodes: OpcodeHistogram,
}
