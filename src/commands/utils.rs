use crate::output::{read_records, ResultRecord};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// What a record file contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputReport {
    pub records: usize,
    pub lowest_block: Option<u64>,
    pub highest_block: Option<u64>,
    pub distinct_blocks: usize,
    pub distinct_contracts: usize,
}

impl OutputReport {
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let blocks: HashSet<u64> = records.iter().map(|r| r.block).collect();
        let contracts: HashSet<&str> = records.iter().map(|r| r.contract.as_str()).collect();

        Self {
            records: records.len(),
            lowest_block: blocks.iter().min().copied(),
            highest_block: blocks.iter().max().copied(),
            distinct_blocks: blocks.len(),
            distinct_contracts: contracts.len(),
        }
    }
}

/// Validate an output file produced by the run command
pub fn validate_output_file(file_path: &Path) -> Result<OutputReport> {
    println!("Validating output: {}", file_path.display());

    let records = read_records(file_path)
        .with_context(|| format!("Invalid output file {}", file_path.display()))?;
    let report = OutputReport::from_records(&records);

    println!("✓ Valid newline-delimited JSON");
    println!("  Records: {}", report.records);
    match (report.lowest_block, report.highest_block) {
        (Some(low), Some(high)) => {
            println!("  Blocks: {} ({} - {})", report.distinct_blocks, low, high)
        }
        _ => println!("  Blocks: 0"),
    }
    println!("  Contracts: {}", report.distinct_contracts);

    Ok(report)
}

/// Display version information
pub fn display_version() {
    println!("opcode-stats v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Collects per-transaction opcode histograms over a block range.");
}
