//! Newline-delimited JSON encoding of result records.

use super::schema::ResultRecord;
use crate::utils::error::OutputError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Encode a record as one compact JSON line, including the trailing newline
///
/// **Public** - used by the sink and by tests
pub fn encode_line(record: &ResultRecord) -> Result<Vec<u8>, OutputError> {
    let mut line = serde_json::to_vec(record).map_err(OutputError::SerializationFailed)?;
    line.push(b'\n');
    Ok(line)
}

/// Parse one output line back into a record
pub fn decode_line(line: &str) -> Result<ResultRecord, serde_json::Error> {
    serde_json::from_str(line.trim_end())
}

/// Read every record from an output file
///
/// **Public** - useful for validation and testing
///
/// Blank lines are ignored. The first malformed line aborts the read with
/// its 1-based line number.
pub fn read_records(input_path: impl AsRef<Path>) -> Result<Vec<ResultRecord>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading records from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(OutputError::WriteFailed)?;
        if line.trim().is_empty() {
            continue;
        }
        let record = decode_line(&line).map_err(|source| OutputError::MalformedLine {
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    debug!("Loaded {} records", records.len());

    Ok(records)
}
