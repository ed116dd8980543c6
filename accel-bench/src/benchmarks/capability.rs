//! Capability-probing benchmarks. These register with
//! "runs without device context": they construct their own context and are
//! expected to run even where none could be provided up front.

use accel_harness::argument::EmptyArguments;
use accel_harness::backend::HostContext;
use accel_harness::statistics::{Classification, MeasurementContext, MeasurementUnit};
use accel_harness::{Api, Registry, RegistryError, Statistics, TestResult, Timer};

use super::{noop_declare, push_sample};

const GROUP: &str = "capability";

fn run_context_create(arguments: &EmptyArguments, statistics: &mut Statistics) -> TestResult {
    let selector =
        Classification::new(MeasurementUnit::Microseconds, MeasurementContext::Host);
    if statistics.is_noop() {
        return noop_declare(statistics, selector);
    }

    // Warmup
    match HostContext::new() {
        Ok(context) => drop(context),
        Err(error) => {
            log::warn!("context creation failed: {error}");
            return TestResult::DeviceNotCapable;
        }
    }

    let mut timer = Timer::new();
    for _ in 0..arguments.common.iterations.get() {
        timer.start();
        let context = HostContext::new();
        timer.stop();
        match context {
            Ok(context) => drop(context),
            Err(error) => {
                log::warn!("context creation failed: {error}");
                return TestResult::DeviceNotCapable;
            }
        }
        if let Err(result) = push_sample(statistics, timer.elapsed(), selector) {
            return result;
        }
    }
    TestResult::Success
}

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        "ContextCreate",
        GROUP,
        "measures time required to create an execution context",
        || Box::new(EmptyArguments::new()),
    )?;
    registry.register_implementation::<EmptyArguments, _>(
        "ContextCreate",
        Api::Host,
        true,
        run_context_create,
    )?;
    Ok(())
}
