use clap::Parser;

/// Micro-benchmark suite for accelerator API overheads.
///
/// Harness flags come before the benchmark name; everything after it is
/// handed to the benchmark's own argument container (`--key=value`,
/// including the implicit `--api` and `--iterations`).
#[derive(Parser, Debug)]
#[command(name = "accel-bench", version, about)]
pub struct BenchArgs {
    /// Benchmark to run. Omit to run the whole catalog.
    #[arg(value_name = "BENCHMARK")]
    pub benchmark: Option<String>,

    /// List registered benchmarks with their arguments and exit.
    #[arg(long)]
    pub list: bool,

    /// Substring filter on benchmark names; misses are reported as
    /// filtered out without running.
    #[arg(long)]
    pub filter: Option<String>,

    /// Declare each benchmark's measurement shape without executing it.
    #[arg(long)]
    pub noop: bool,

    /// Relative tolerance around the median for the robust mean.
    #[arg(long, default_value_t = 0.5)]
    pub tolerance: f64,

    /// Write JSON results to file.
    #[arg(long)]
    pub json_file: Option<String>,

    /// Write CSV results to file.
    #[arg(long)]
    pub csv_file: Option<String>,

    /// Benchmark arguments (e.g. --size=64K --api=Host --iterations=100).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
