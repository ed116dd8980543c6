mod benchmarks;
mod cli;
mod data_gen;
mod output;

use clap::Parser;

use accel_harness::runner::{run_all, run_benchmark, summarize, RunConfig};
use accel_harness::Registry;

use cli::BenchArgs;
use output::progress::RunProgress;

fn main() {
    env_logger::init();
    let args = BenchArgs::parse();

    let mut registry = Registry::new();
    if let Err(error) = benchmarks::register_all(&mut registry) {
        eprintln!("Benchmark registration failed: {error}");
        std::process::exit(2);
    }

    if args.list {
        output::table::print_catalog(&registry);
        return;
    }

    let config = RunConfig {
        noop: args.noop,
        filter: args.filter.clone(),
        tolerance: args.tolerance,
    };

    let records = match &args.benchmark {
        Some(name) => match run_benchmark(&registry, name, &args.args, &config) {
            Ok(records) => {
                output::summary::print_single(&records);
                records
            }
            Err(error) => {
                eprintln!("{error}");
                eprintln!(
                    "Known benchmarks: {}",
                    registry
                        .entries()
                        .map(|entry| entry.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                std::process::exit(2);
            }
        },
        None => {
            let progress = RunProgress::new();
            let callback = progress.callback();
            let records = run_all(&registry, &args.args, &config, Some(&callback));
            progress.finish();
            output::summary::print_batch(&records);
            output::table::render_summary(&records);
            records
        }
    };

    let totals = summarize(&records);
    output::summary::print_totals(&totals);

    if let Some(path) = &args.json_file {
        if let Err(error) = output::json::write_json(path, &records) {
            eprintln!("Error writing JSON: {error}");
        }
    }
    if let Some(path) = &args.csv_file {
        if let Err(error) = output::csv::write_csv(path, &records) {
            eprintln!("Error writing CSV: {error}");
        }
    }

    if totals.failed > 0 {
        std::process::exit(1);
    }
}
