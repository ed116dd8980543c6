//! Dispatch pipeline: takes a benchmark name and raw argument tokens
//! through filtering, binding, catalog lookup, context gating, and
//! invocation, settling exactly one [`TestResult`] per (benchmark, API)
//! pair.
//!
//! A failure inside an implementation never aborts the batch: fallible
//! calls surface as outcomes, and panics are caught and downgraded to
//! [`TestResult::Error`].

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::api::{Api, ApiSelection};
use crate::argument::bind_tokens;
use crate::backend::context_available;
use crate::registry::{CatalogEntry, Registry, RegistryError};
use crate::result::TestResult;
use crate::statistics::{Aggregate, Classification, Statistics, DEFAULT_TOLERANCE};

/// Per-process run settings, constructed once and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Declare measurement shapes without executing anything.
    pub noop: bool,
    /// Substring filter on benchmark names; misses settle as `FilteredOut`
    /// before any setup.
    pub filter: Option<String>,
    /// Relative tolerance around the median for the robust mean.
    pub tolerance: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            noop: false,
            filter: None,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// The settled result of dispatching one benchmark against one API.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub benchmark: String,
    /// None when the run never reached a specific API (filtered out,
    /// invalid arguments, no implementation at all).
    pub api: Option<Api>,
    /// `Name(key=value ...)` with explicitly-set arguments only.
    pub command_line: String,
    pub result: TestResult,
    pub classification: Option<Classification>,
    pub aggregate: Option<Aggregate>,
    pub sample_count: usize,
}

impl RunRecord {
    fn terminal(benchmark: &str, api: Option<Api>, result: TestResult) -> Self {
        Self {
            benchmark: benchmark.to_string(),
            api,
            command_line: benchmark.to_string(),
            result,
            classification: None,
            aggregate: None,
            sample_count: 0,
        }
    }
}

/// Pass/fail accounting over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub fn summarize(records: &[RunRecord]) -> RunSummary {
    let mut summary = RunSummary::default();
    for record in records {
        if record.result.is_success() {
            summary.passed += 1;
        } else if record.result.is_skipped() {
            summary.skipped += 1;
        } else {
            summary.failed += 1;
        }
    }
    summary
}

/// Run one benchmark by name. An unknown name is an error (unlike an
/// unregistered API, which settles as a record).
pub fn run_benchmark(
    registry: &Registry,
    name: &str,
    tokens: &[String],
    config: &RunConfig,
) -> Result<Vec<RunRecord>, RegistryError> {
    let entry = registry
        .get(name)
        .ok_or_else(|| RegistryError::UnknownBenchmark(name.to_string()))?;
    Ok(run_entry(entry, tokens, config))
}

/// Run the whole catalog, applying the configured name filter.
pub fn run_all(
    registry: &Registry,
    tokens: &[String],
    config: &RunConfig,
    progress: Option<&dyn Fn(&str)>,
) -> Vec<RunRecord> {
    let mut records = Vec::new();
    for entry in registry.entries() {
        if let Some(cb) = progress {
            cb(entry.name());
        }
        records.extend(run_entry(entry, tokens, config));
    }
    records
}

fn run_entry(entry: &CatalogEntry, tokens: &[String], config: &RunConfig) -> Vec<RunRecord> {
    if let Some(filter) = &config.filter {
        if !entry.name().contains(filter.as_str()) {
            return vec![RunRecord::terminal(
                entry.name(),
                None,
                TestResult::FilteredOut,
            )];
        }
    }

    let mut container = entry.new_arguments();
    if let Err(errors) = bind_tokens(container.as_mut(), tokens) {
        for error in &errors {
            log::error!("{}: {error}", entry.name());
        }
        return vec![RunRecord::terminal(
            entry.name(),
            None,
            TestResult::InvalidArgs,
        )];
    }

    if entry.implementation_count() == 0 {
        return vec![RunRecord::terminal(
            entry.name(),
            None,
            TestResult::NoImplementation,
        )];
    }

    let targets: Vec<Api> = match container.common().api.get() {
        ApiSelection::All => entry.apis().collect(),
        ApiSelection::Single(api) => vec![api],
    };

    let command_line = container.as_ref().command_line(entry.name());
    let mut records = Vec::with_capacity(targets.len());
    for api in targets {
        let Some(implementation) = entry.implementation(api) else {
            records.push(RunRecord::terminal(
                entry.name(),
                Some(api),
                TestResult::SkippedApi,
            ));
            continue;
        };

        if !context_available(api) && !implementation.runs_without_context {
            records.push(RunRecord::terminal(
                entry.name(),
                Some(api),
                TestResult::UnsupportedApi,
            ));
            continue;
        }

        let mut statistics = Statistics::configured(config.noop, config.tolerance);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            implementation.run(container.as_ref(), &mut statistics)
        }));
        let mut result = match outcome {
            Ok(result) => result,
            Err(payload) => {
                log::error!(
                    "{} [{api}] panicked: {}",
                    entry.name(),
                    panic_message(payload.as_ref())
                );
                TestResult::Error
            }
        };

        if result.is_success() && statistics.sample_count() == 0 {
            log::error!(
                "{} [{api}] returned Success without samples; this is a harness defect",
                entry.name()
            );
            result = TestResult::Error;
        }

        records.push(RunRecord {
            benchmark: entry.name().to_string(),
            api: Some(api),
            command_line: command_line.clone(),
            result,
            classification: statistics.classification(),
            aggregate: statistics.reduce(),
            sample_count: statistics.sample_count(),
        });
    }
    records
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{ArgumentContainer, EmptyArguments};
    use crate::statistics::{MeasurementContext, MeasurementUnit};
    use std::time::Duration;

    fn classification() -> Classification {
        Classification::new(MeasurementUnit::Microseconds, MeasurementContext::Host)
    }

    fn empty_prototype() -> Box<dyn crate::argument::ArgumentContainer> {
        Box::new(EmptyArguments::new())
    }

    fn measuring_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("Probe", "misc", "probes", empty_prototype)
            .unwrap();
        registry
            .register_implementation::<EmptyArguments, _>(
                "Probe",
                Api::Host,
                false,
                |args, stats| {
                    let selector = classification();
                    if stats.is_noop() {
                        if stats.declare_classification(selector).is_err() {
                            return TestResult::Error;
                        }
                        return TestResult::Nooped;
                    }
                    for _ in 0..args.common().iterations.get() {
                        if stats
                            .push_value(Duration::from_micros(7), selector)
                            .is_err()
                        {
                            return TestResult::Error;
                        }
                    }
                    TestResult::Success
                },
            )
            .unwrap();
        registry
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_success_pushes_one_sample_per_iteration() {
        let registry = measuring_registry();
        let records = run_benchmark(
            &registry,
            "Probe",
            &tokens(&["--iterations=6"]),
            &RunConfig::default(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result, TestResult::Success);
        assert_eq!(records[0].sample_count, 6);
        assert!(records[0].aggregate.is_some());
        assert_eq!(records[0].classification, Some(classification()));
    }

    #[test]
    fn test_noop_run_declares_and_skips() {
        let registry = measuring_registry();
        let config = RunConfig {
            noop: true,
            ..RunConfig::default()
        };
        let records = run_benchmark(&registry, "Probe", &[], &config).unwrap();
        assert_eq!(records[0].result, TestResult::Nooped);
        assert_eq!(records[0].sample_count, 0);
        assert_eq!(records[0].classification, Some(classification()));
        assert!(records[0].aggregate.is_none());
    }

    #[test]
    fn test_unknown_benchmark_is_an_error() {
        let registry = measuring_registry();
        assert_eq!(
            run_benchmark(&registry, "Ghost", &[], &RunConfig::default()).unwrap_err(),
            RegistryError::UnknownBenchmark("Ghost".to_string())
        );
    }

    #[test]
    fn test_unregistered_api_settles_as_skipped() {
        let registry = measuring_registry();
        let records = run_benchmark(
            &registry,
            "Probe",
            &tokens(&["--api=OpenCL"]),
            &RunConfig::default(),
        )
        .unwrap();
        assert_eq!(records[0].result, TestResult::SkippedApi);
        assert_eq!(records[0].api, Some(Api::OpenCl));
        assert_eq!(records[0].sample_count, 0);
    }

    #[test]
    fn test_invalid_arguments_settle_before_dispatch() {
        let registry = measuring_registry();
        let records = run_benchmark(
            &registry,
            "Probe",
            &tokens(&["--iterations=0"]),
            &RunConfig::default(),
        )
        .unwrap();
        assert_eq!(records[0].result, TestResult::InvalidArgs);
        assert_eq!(records[0].api, None);
    }

    #[test]
    fn test_unknown_key_settles_as_invalid_args() {
        let registry = measuring_registry();
        let records = run_benchmark(
            &registry,
            "Probe",
            &tokens(&["--bogus=1"]),
            &RunConfig::default(),
        )
        .unwrap();
        assert_eq!(records[0].result, TestResult::InvalidArgs);
    }

    #[test]
    fn test_metadata_without_implementation() {
        let mut registry = Registry::new();
        registry
            .register("Bare", "misc", "", empty_prototype)
            .unwrap();
        let records =
            run_benchmark(&registry, "Bare", &[], &RunConfig::default()).unwrap();
        assert_eq!(records[0].result, TestResult::NoImplementation);
    }

    #[test]
    fn test_filter_miss_settles_before_binding() {
        let registry = measuring_registry();
        let config = RunConfig {
            filter: Some("Memory".to_string()),
            ..RunConfig::default()
        };
        // Tokens would be invalid, proving binding never ran.
        let records =
            run_benchmark(&registry, "Probe", &tokens(&["--bogus=1"]), &config).unwrap();
        assert_eq!(records[0].result, TestResult::FilteredOut);
    }

    #[test]
    fn test_panic_is_downgraded_to_error() {
        let mut registry = Registry::new();
        registry
            .register("Explodes", "misc", "", empty_prototype)
            .unwrap();
        registry
            .register_implementation::<EmptyArguments, _>(
                "Explodes",
                Api::Host,
                false,
                |_args, _stats| panic!("driver call failed"),
            )
            .unwrap();
        let records =
            run_benchmark(&registry, "Explodes", &[], &RunConfig::default()).unwrap();
        assert_eq!(records[0].result, TestResult::Error);
    }

    #[test]
    fn test_success_without_samples_is_downgraded() {
        let mut registry = Registry::new();
        registry
            .register("Hollow", "misc", "", empty_prototype)
            .unwrap();
        registry
            .register_implementation::<EmptyArguments, _>(
                "Hollow",
                Api::Host,
                false,
                |_args, _stats| TestResult::Success,
            )
            .unwrap();
        let records =
            run_benchmark(&registry, "Hollow", &[], &RunConfig::default()).unwrap();
        assert_eq!(records[0].result, TestResult::Error);
    }

    #[test]
    fn test_run_all_covers_catalog_in_order() {
        let mut registry = measuring_registry();
        registry
            .register("Another", "misc", "", empty_prototype)
            .unwrap();
        let seen = std::cell::RefCell::new(Vec::new());
        let progress = |name: &str| seen.borrow_mut().push(name.to_string());
        let records = run_all(&registry, &[], &RunConfig::default(), Some(&progress));
        assert_eq!(
            *seen.borrow(),
            vec!["Another".to_string(), "Probe".to_string()]
        );
        // Another: NoImplementation; Probe: Success.
        assert_eq!(records.len(), 2);
        let summary = summarize(&records);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_summary_counts_failures() {
        let records = vec![
            RunRecord::terminal("A", None, TestResult::FilteredOut),
            RunRecord::terminal("B", Some(Api::Host), TestResult::VerificationFail),
        ];
        let summary = summarize(&records);
        assert_eq!(
            summary,
            RunSummary {
                passed: 0,
                failed: 1,
                skipped: 1
            }
        );
    }
}
