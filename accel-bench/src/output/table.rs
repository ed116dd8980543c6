//! Batch summary table (comfy-table) and catalog listing for `--list`.

use std::collections::BTreeMap;

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use accel_harness::runner::RunRecord;
use accel_harness::Registry;

use super::summary::status_label;

/// Render all settled records as a summary table.
pub fn render_summary(records: &[RunRecord]) {
    if records.is_empty() {
        println!("No results to display.");
        return;
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Benchmark").add_attribute(Attribute::Bold),
            Cell::new("API").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Mean").add_attribute(Attribute::Bold),
            Cell::new("Median").add_attribute(Attribute::Bold),
            Cell::new("Robust").add_attribute(Attribute::Bold),
            Cell::new("Unit").add_attribute(Attribute::Bold),
            Cell::new("Samples").add_attribute(Attribute::Bold),
        ]);

    for record in records {
        let status = status_label(record.result);
        let status_cell = if record.result.is_success() {
            Cell::new(status).fg(Color::Green)
        } else if record.result.is_failure() {
            Cell::new(status).fg(Color::Red)
        } else {
            Cell::new(status).fg(Color::Yellow)
        };

        let (mean, median, robust, samples) = match &record.aggregate {
            Some(agg) => (
                format!("{:.3}", agg.mean),
                format!("{:.3}", agg.median),
                format!("{:.3}", agg.robust_mean),
                agg.sample_count.to_string(),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string(), "0".to_string()),
        };
        let unit = record
            .classification
            .map(|c| c.unit.label())
            .unwrap_or("-");

        table.add_row(vec![
            Cell::new(&record.command_line),
            Cell::new(record.api.map(|api| api.name()).unwrap_or("-")),
            status_cell,
            Cell::new(mean),
            Cell::new(median),
            Cell::new(robust),
            Cell::new(unit),
            Cell::new(samples),
        ]);
    }

    println!("{table}");
}

/// Print the catalog grouped by suite, with each benchmark's arguments,
/// their defaults, and help strings.
pub fn print_catalog(registry: &Registry) {
    let mut groups: BTreeMap<&str, Vec<&accel_harness::registry::CatalogEntry>> = BTreeMap::new();
    for entry in registry.entries() {
        groups.entry(entry.group()).or_default().push(entry);
    }

    for (group, entries) in groups {
        println!("{group}:");
        for entry in entries {
            println!("  {} -- {}", entry.name(), entry.help());
            let prototype = entry.new_arguments();
            for argument in prototype.arguments() {
                println!(
                    "      --{}=<{}>  {}",
                    argument.key(),
                    argument.display_value(),
                    argument.help()
                );
            }
            let apis: Vec<&str> = entry.apis().map(|api| api.name()).collect();
            println!("      implementations: {}", apis.join(", "));
        }
        println!();
    }
}
