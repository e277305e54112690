//! Output of result records.
//!
//! This module handles:
//! - The record schema written to the stream
//! - Newline-delimited JSON encoding and reading
//! - The single-writer sink and destination policy

pub mod json;
pub mod schema;
pub mod sink;

// Re-export main types and functions
pub use json::{decode_line, encode_line, read_records};
pub use schema::ResultRecord;
pub use sink::{open_destination, BoxedWriter, Destination, ResultSink, SinkStats};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
