// tests/pipeline_tests.rs - library-level runs against files on disk
use std::fs;
use tempfile::TempDir;

use logsheet::{LogPipeline, OutputFormat, PipelineConfig, ProcessingError, COLUMNS};

const GOOD: &str = r#"date: 2024-01-15T10:30:00.123456Z | Payment failed: pay-api | product: Payments| endpoint: /v1/pay| transaction_id: tx-9| flow_id: fl-3| message: gateway timeout|serviceType: PIX type: OUT status: FAILED metadata: {""type"":""A"",""status"":""B""}"#;
const BAD_DATE: &str = "date: 2024-13-45T99:99:99.000000Z | ERROR: svc | product: S| endpoint: /e| transaction_id: t| flow_id: f| message: x";

fn config_for(dir: &TempDir, contents: &str) -> PipelineConfig {
    let input = dir.path().join("logs.csv");
    fs::write(&input, contents).unwrap();
    PipelineConfig {
        output_dir: dir.path().to_path_buf(),
        output_format: OutputFormat::Csv,
        run_id: Some("00000000".to_string()),
        ..PipelineConfig::new(input)
    }
}

#[test]
fn test_run_writes_one_row_per_matched_line() {
    let dir = TempDir::new().unwrap();
    let contents = format!("{}\ngarbage\n\n{}\n", GOOD, BAD_DATE);
    let mut pipeline = LogPipeline::new(config_for(&dir, &contents));

    let path = pipeline.run().unwrap();
    assert_eq!(path, dir.path().join("logs-00000000.csv"));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, COLUMNS.to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(&first[0], "2024-01-15T10:30:00.123456Z");
    assert_eq!(&first[1], "Payment failed");
    assert_eq!(&first[2], "pay-api");
    assert_eq!(&first[7], "PIX");
    assert_eq!(&first[8], "OUT");
    assert_eq!(&first[9], "FAILED");
    assert_eq!(&first[10], "");
    assert_eq!(&first[11], "A");
    assert_eq!(&first[12], "B");
    assert_eq!(&first[17], "gateway timeout");

    // unparsable datetime becomes an empty cell, the row survives
    assert_eq!(&rows[1][0], "");
    assert_eq!(&rows[1][17], "x");

    let stats = pipeline.stats();
    assert_eq!(stats.lines_seen, 4);
    assert_eq!(stats.records_output, 2);
    assert_eq!(stats.unmatched_lines, 1);
    assert_eq!(stats.blank_lines, 1);
    assert_eq!(stats.metadata_found, 1);
}

#[test]
fn test_run_without_matches_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = LogPipeline::new(config_for(&dir, "timestamp,message\nnothing here\n"));

    assert!(matches!(pipeline.run(), Err(ProcessingError::NoRecords)));
    assert!(!dir.path().join("logs-00000000.csv").exists());
}

#[test]
fn test_run_xlsx() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        output_format: OutputFormat::Xlsx,
        ..config_for(&dir, GOOD)
    };
    let mut pipeline = LogPipeline::new(config);

    let path = pipeline.run().unwrap();
    assert_eq!(path, dir.path().join("logs-00000000.xlsx"));
    // xlsx is a zip archive
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
