//! CSV export for benchmark results.
//!
//! Columns: benchmark,api,status,unit,context,mean,median,robust,min,max,
//! stddev,samples. Missing aggregates leave numeric fields empty.

use std::fs;
use std::io::Write;
use std::path::Path;

use accel_harness::runner::RunRecord;

use super::summary::status_label;

/// Write settled records to a CSV file.
pub fn write_csv(path: &str, records: &[RunRecord]) -> Result<(), String> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {e}", parent.display()))?;
        }
    }

    let mut file =
        fs::File::create(path).map_err(|e| format!("Failed to create {path}: {e}"))?;

    writeln!(
        file,
        "benchmark,api,status,unit,context,mean,median,robust,min,max,stddev,samples"
    )
    .map_err(|e| format!("Write error: {e}"))?;

    for record in records {
        let api = record.api.map(|api| api.name()).unwrap_or("");
        let (unit, context) = record
            .classification
            .map(|c| (c.unit.label(), c.context.label()))
            .unwrap_or(("", ""));
        let numbers = match &record.aggregate {
            Some(agg) => format!(
                "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                agg.mean, agg.median, agg.robust_mean, agg.min, agg.max, agg.stddev
            ),
            None => ",,,,,".to_string(),
        };
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            record.benchmark,
            api,
            status_label(record.result),
            unit,
            context,
            numbers,
            record.sample_count,
        )
        .map_err(|e| format!("Write error: {e}"))?;
    }

    println!("CSV results written to: {path}");
    Ok(())
}
