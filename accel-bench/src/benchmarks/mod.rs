//! Benchmark suites and the registration manifest.
//!
//! Every suite registers its metadata and host-backend implementations
//! against the registry passed in; [`register_all`] is the single ordered
//! manifest invoked at startup. A registration failure is a build
//! configuration error and aborts startup.

pub mod capability;
pub mod memory;
pub mod submission;
pub mod sync;

use std::time::Duration;

use accel_harness::statistics::Classification;
use accel_harness::{Registry, RegistryError, Statistics, TestResult};

pub fn register_all(registry: &mut Registry) -> Result<(), RegistryError> {
    memory::register(registry)?;
    submission::register(registry)?;
    sync::register(registry)?;
    capability::register(registry)?;
    Ok(())
}

/// Declare-only path shared by every implementation's noop check.
pub(crate) fn noop_declare(
    statistics: &mut Statistics,
    classification: Classification,
) -> TestResult {
    match statistics.declare_classification(classification) {
        Ok(()) => TestResult::Nooped,
        Err(error) => {
            log::error!("classification declaration rejected: {error}");
            TestResult::Error
        }
    }
}

pub(crate) fn push_sample(
    statistics: &mut Statistics,
    elapsed: Duration,
    classification: Classification,
) -> Result<(), TestResult> {
    statistics.push_value(elapsed, classification).map_err(|error| {
        log::error!("statistics rejected sample: {error}");
        TestResult::Error
    })
}

pub(crate) fn push_sample_with_bytes(
    statistics: &mut Statistics,
    elapsed: Duration,
    bytes: u64,
    classification: Classification,
) -> Result<(), TestResult> {
    statistics
        .push_value_with_bytes(elapsed, bytes, classification)
        .map_err(|error| {
            log::error!("statistics rejected sample: {error}");
            TestResult::Error
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_harness::runner::{run_all, summarize, RunConfig};

    #[test]
    fn test_manifest_registers_every_suite_once() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        assert_eq!(registry.len(), 7);
        for name in [
            "BufferCopy",
            "BufferFill",
            "RegionCopy",
            "TaskSubmission",
            "WorkerWakeup",
            "BarrierCrossing",
            "ContextCreate",
        ] {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn test_manifest_is_not_reentrant() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        assert!(register_all(&mut registry).is_err());
    }

    #[test]
    fn test_noop_discovery_covers_whole_catalog() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        let config = RunConfig {
            noop: true,
            ..RunConfig::default()
        };
        let records = run_all(&registry, &[], &config, None);
        assert_eq!(records.len(), registry.len());
        for record in &records {
            assert_eq!(record.result, TestResult::Nooped, "{}", record.benchmark);
            assert!(
                record.classification.is_some(),
                "{} declared no classification",
                record.benchmark
            );
            assert_eq!(record.sample_count, 0, "{}", record.benchmark);
        }
    }

    #[test]
    fn test_small_batch_run_passes_everywhere() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        let tokens = vec!["--iterations=2".to_string()];
        // Suites honor --size where declared; keep the memory suites small.
        let records = run_all(&registry, &tokens, &RunConfig::default(), None);
        let summary = summarize(&records);
        assert_eq!(summary.failed, 0, "{records:#?}");
        assert_eq!(summary.passed, records.len());
    }
}
