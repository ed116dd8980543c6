//! JSON report for benchmark results.

use std::fs;
use std::path::Path;

use serde::Serialize;

use accel_harness::runner::RunRecord;
use accel_harness::statistics::{Aggregate, Classification};

use super::summary::status_label;

#[derive(Serialize)]
struct JsonReport {
    timestamp: String,
    results: Vec<JsonRecord>,
}

#[derive(Serialize)]
struct JsonRecord {
    benchmark: String,
    api: Option<&'static str>,
    command_line: String,
    outcome: String,
    status: &'static str,
    classification: Option<Classification>,
    aggregate: Option<Aggregate>,
    samples: usize,
}

impl JsonRecord {
    fn from_record(record: &RunRecord) -> Self {
        Self {
            benchmark: record.benchmark.clone(),
            api: record.api.map(|api| api.name()),
            command_line: record.command_line.clone(),
            outcome: format!("{:?}", record.result),
            status: status_label(record.result),
            classification: record.classification,
            aggregate: record.aggregate.clone(),
            samples: record.sample_count,
        }
    }
}

/// Write settled records to a JSON file.
pub fn write_json(path: &str, records: &[RunRecord]) -> Result<(), String> {
    let report = JsonReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        results: records.iter().map(JsonRecord::from_record).collect(),
    };

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {e}", parent.display()))?;
        }
    }

    fs::write(path, json).map_err(|e| format!("Failed to write {path}: {e}"))?;

    println!("JSON results written to: {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_harness::{Api, TestResult};

    fn sample_records() -> Vec<RunRecord> {
        vec![RunRecord {
            benchmark: "BufferCopy".to_string(),
            api: Some(Api::Host),
            command_line: "BufferCopy(size=64K)".to_string(),
            result: TestResult::Nooped,
            classification: None,
            aggregate: None,
            sample_count: 0,
        }]
    }

    #[test]
    fn test_write_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        write_json(path.to_str().unwrap(), &sample_records()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["timestamp"].is_string());
        assert_eq!(value["results"][0]["benchmark"], "BufferCopy");
        assert_eq!(value["results"][0]["outcome"], "Nooped");
        assert_eq!(value["results"][0]["status"], "NOOP");
        assert_eq!(value["results"][0]["api"], "Host");
    }

    #[test]
    fn test_write_json_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/results.json");
        write_json(path.to_str().unwrap(), &sample_records()).unwrap();
        assert!(path.exists());
    }
}
