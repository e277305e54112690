//! opcode-stats
//!
//! Walks a range of blocks from an Ethereum node, traces every transaction
//! that calls a contract, and writes one opcode histogram per transaction as
//! newline-delimited JSON.
//!
//! This crate provides the core implementation for the `opcode-stats` CLI
//! tool and exposes the pipeline for use with any [`rpc::ChainClient`].
//!
//! ## Getting Started
//!
//! ```bash
//! opcode-stats run --url http://localhost:8545 --start-block 100 -c 8 -o ops.jsonl
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod pipeline;
pub mod rpc;
pub mod utils;
