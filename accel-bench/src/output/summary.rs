//! Result lines and pass/fail totals, honoring each outcome's reporting
//! metadata: some outcomes print only for a single-benchmark run, some in
//! batch summaries too, and successes always print.

use accel_harness::runner::{RunRecord, RunSummary};
use accel_harness::TestResult;

/// Short status label. `Success` carries no outcome metadata; its results
/// live in the aggregate.
pub fn status_label(result: TestResult) -> &'static str {
    match result.info() {
        None => "SUCCESS",
        Some(info) => info.message,
    }
}

/// Format one settled record.
pub fn result_line(record: &RunRecord) -> String {
    let api = record.api.map(|api| api.name()).unwrap_or("-");
    match (&record.aggregate, &record.classification) {
        (Some(aggregate), Some(classification)) if record.result.is_success() => format!(
            "{:<56} [{api:>9}] mean {:>10.3} median {:>10.3} robust {:>10.3} \
             min {:>10.3} max {:>10.3} {} ({}, {} samples)",
            record.command_line,
            aggregate.mean,
            aggregate.median,
            aggregate.robust_mean,
            aggregate.min,
            aggregate.max,
            classification.unit.label(),
            classification.context.label(),
            aggregate.sample_count,
        ),
        _ => format!(
            "{:<56} [{api:>9}] {}",
            record.command_line,
            status_label(record.result)
        ),
    }
}

fn should_print(record: &RunRecord, batch: bool) -> bool {
    match record.result.info() {
        None => true,
        Some(info) => {
            if batch {
                info.print_batch
            } else {
                info.print_single
            }
        }
    }
}

/// Print records of a single-benchmark invocation.
pub fn print_single(records: &[RunRecord]) {
    for record in records.iter().filter(|r| should_print(r, false)) {
        println!("{}", result_line(record));
    }
}

/// Print records of a batch invocation over the catalog.
pub fn print_batch(records: &[RunRecord]) {
    for record in records.iter().filter(|r| should_print(r, true)) {
        println!("{}", result_line(record));
    }
}

pub fn print_totals(summary: &RunSummary) {
    println!();
    println!(
        "Passed: {}  Failed: {}  Skipped: {}",
        summary.passed, summary.failed, summary.skipped
    );
}
