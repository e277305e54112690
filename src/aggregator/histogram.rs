//! Reduce a struct-logger trace into per-opcode occurrence counts.

use crate::rpc::types::{StructLog, Trace};
use std::collections::BTreeMap;

/// Opcode name -> number of times it was executed.
///
/// Ordered so that serialized records are byte-stable across runs.
pub type OpcodeHistogram = BTreeMap<String, u64>;

/// Count every step of a trace by opcode name
///
/// **Public** - main entry point for trace reduction
///
/// A trace with no steps yields an empty histogram; any key present has a
/// count of at least 1.
pub fn build_opcode_histogram(trace: &Trace) -> OpcodeHistogram {
    count_opcodes(&trace.struct_logs)
}

/// Single linear pass over the steps
pub fn count_opcodes(steps: &[StructLog]) -> OpcodeHistogram {
    let mut histogram = OpcodeHistogram::new();

    for step in steps {
        *histogram.entry(step.op.clone()).or_insert(0) += 1;
    }

    histogram
}

/// Total number of steps represented by a histogram
pub fn total_steps(histogram: &OpcodeHistogram) -> u64 {
    histogram.values().sum()
}
