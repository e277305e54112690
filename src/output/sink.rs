//! Single-writer sink for result records.
//!
//! Every record passes through one `ResultSink`, which owns the destination
//! exclusively. Producers hand records over a bounded channel; the sink
//! serializes, writes and flushes them one at a time, so lines never
//! interleave and nothing queues beyond the channel's capacity.

use super::json::encode_line;
use super::schema::ResultRecord;
use super::validate_path;
use crate::utils::error::OutputError;
use log::{debug, error, info};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

/// Writer type produced by `open_destination`
pub type BoxedWriter = Box<dyn Write + Send>;

/// Where records end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Process standard output
    Stdout,

    /// A file; an existing file is only replaced when `overwrite` is set
    File { path: PathBuf, overwrite: bool },
}

impl Destination {
    /// Build from the `--output` / `--overwrite` pair
    pub fn from_output(output: Option<PathBuf>, overwrite: bool) -> Self {
        match output {
            Some(path) => Destination::File { path, overwrite },
            None => Destination::Stdout,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Destination::Stdout => "stdout".to_string(),
            Destination::File { path, .. } => path.display().to_string(),
        }
    }
}

/// Open the destination for writing
///
/// **Public** - called before any RPC traffic so conflicts fail fast
///
/// # Errors
/// * `OutputError::AlreadyExists` - file exists and overwrite is off
/// * `OutputError::InvalidPath` - empty path, directory, or uncreatable parent
/// * `OutputError::WriteFailed` - any other I/O error
pub fn open_destination(destination: &Destination) -> Result<BoxedWriter, OutputError> {
    match destination {
        Destination::Stdout => Ok(Box::new(io::stdout())),
        Destination::File { path, overwrite } => {
            let file = open_file(path, *overwrite)?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

fn open_file(path: &Path, overwrite: bool) -> Result<File, OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        // Existence check and creation in one step
        options.create_new(true);
    }

    options.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => OutputError::AlreadyExists(path.to_path_buf()),
        _ => OutputError::WriteFailed(e),
    })
}

/// Counters reported by the sink when its channel closes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Lines successfully written and flushed
    pub written: u64,

    /// Records dropped because they could not be serialized
    pub dropped: u64,

    /// I/O failure that stopped the sink, if any
    pub error: Option<String>,
}

/// The single consumer of result records
pub struct ResultSink<W: Write> {
    writer: W,
    label: String,
}

impl<W: Write> ResultSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            label: "output".to_string(),
        }
    }

    /// Name used in log lines (usually the destination path)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Serialize, write and flush one record
    pub fn write_record(&mut self, record: &ResultRecord) -> Result<(), OutputError> {
        let line = encode_line(record)?;
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Drain the channel until every sender is gone
    ///
    /// Serialization failures drop the record and continue. A write failure
    /// stops the sink; returning drops the receiver, which producers observe
    /// as a failed send.
    pub fn run(&mut self, records: Receiver<ResultRecord>) -> SinkStats {
        let mut stats = SinkStats::default();

        for record in records.iter() {
            match self.write_record(&record) {
                Ok(()) => stats.written += 1,
                Err(OutputError::SerializationFailed(e)) => {
                    error!(
                        "error marshalling record for block {} tx {}: {}",
                        record.block, record.tx_index, e
                    );
                    stats.dropped += 1;
                }
                Err(e) => {
                    error!("Failed to write to {}: {}", self.label, e);
                    stats.error = Some(e.to_string());
                    break;
                }
            }
        }

        info!(
            "Sink closed: {} lines written to {}, {} dropped",
            stats.written, self.label, stats.dropped
        );

        stats
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
