use opcode_stats::aggregator::OpcodeHistogram;
use opcode_stats::output::{
    decode_line, encode_line, open_destination, read_records, validate_path, Destination,
    ResultRecord, ResultSink,
};
use opcode_stats::utils::error::OutputError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::mpsc;

fn create_test_record(block: u64, tx_index: usize) -> ResultRecord {
    let mut opcodes = OpcodeHistogram::new();
    opcodes.insert("PUSH1".to_string(), 3);
    opcodes.insert("SSTORE".to_string(), u64::MAX);
    opcodes.insert("STOP".to_string(), 1);

    ResultRecord {
        block,
        tx_index,
        hash: "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060".to_string(),
        contract: "0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string(),
        opcodes,
    }
}

#[test]
fn test_record_line_round_trip() {
    let record = create_test_record(17_000_000, 42);

    let line = String::from_utf8(encode_line(&record).unwrap()).unwrap();
    let decoded = decode_line(&line).unwrap();

    assert_eq!(line.matches('\n').count(), 1);
    assert_eq!(decoded, record);
}

#[test]
fn test_line_uses_output_field_names() {
    let line = String::from_utf8(encode_line(&create_test_record(1, 0)).unwrap()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();

    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();

    assert_eq!(keys, vec!["block", "contract", "data", "hash", "tx"]);
    assert_eq!(value["data"]["PUSH1"], 3);
}

#[test]
fn test_existing_file_without_overwrite_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("ops.jsonl");
    fs::write(&path, "keep me\n").unwrap();

    let destination = Destination::File {
        path: path.clone(),
        overwrite: false,
    };

    match open_destination(&destination) {
        Err(OutputError::AlreadyExists(p)) => assert_eq!(p, path),
        Err(other) => panic!("expected AlreadyExists, got {}", other),
        Ok(_) => panic!("expected AlreadyExists, got a writer"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me\n");
}

#[test]
fn test_existing_file_with_overwrite_is_truncated() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("ops.jsonl");
    fs::write(&path, "stale content that is longer than one record line\n".repeat(20)).unwrap();

    let destination = Destination::File {
        path: path.clone(),
        overwrite: true,
    };
    let mut sink = ResultSink::new(open_destination(&destination).unwrap());
    sink.write_record(&create_test_record(9, 1)).unwrap();
    drop(sink);

    let records = read_records(&path).unwrap();
    assert_eq!(records, vec![create_test_record(9, 1)]);
}

#[test]
fn test_new_file_is_created_with_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("nested/dirs/ops.jsonl");

    let destination = Destination::File {
        path: path.clone(),
        overwrite: false,
    };
    let writer = open_destination(&destination).unwrap();
    drop(writer);

    assert!(path.exists());
}

#[test]
fn test_sink_writes_every_record_to_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("ops.jsonl");
    let destination = Destination::File {
        path: path.clone(),
        overwrite: false,
    };

    let (tx, rx) = mpsc::sync_channel(2);
    let producer = std::thread::spawn(move || {
        for i in 0..10 {
            tx.send(create_test_record(500 - i, 0)).unwrap();
        }
    });

    let mut sink = ResultSink::new(open_destination(&destination).unwrap());
    let stats = sink.run(rx);
    producer.join().unwrap();
    drop(sink);

    assert_eq!(stats.written, 10);
    let records = read_records(&path).unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].block, 500);
    assert_eq!(records[9].block, 491);
}

#[test]
fn test_validate_output_path_empty() {
    let result = validate_path(Path::new(""));
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_directory() {
    // Try to write to a directory path
    let temp_dir = tempfile::tempdir().unwrap();
    let result = validate_path(temp_dir.path());
    assert!(result.is_err());

    let destination = Destination::File {
        path: temp_dir.path().to_path_buf(),
        overwrite: true,
    };
    assert!(matches!(
        open_destination(&destination),
        Err(OutputError::InvalidPath(_))
    ));
}
