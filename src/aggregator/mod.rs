//! Aggregation of trace data into opcode histograms.

pub mod histogram;

// Re-export main types and functions
pub use histogram::{build_opcode_histogram, count_opcodes, total_steps, OpcodeHistogram};
