//! Queue submission benchmarks: round-trip latency through the host queue
//! and submit-to-first-write wakeup latency.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use accel_harness::argument::EmptyArguments;
use accel_harness::backend::{BackendError, HostContext};
use accel_harness::statistics::{Classification, MeasurementContext, MeasurementUnit};
use accel_harness::{Api, Registry, RegistryError, Statistics, TestResult, Timer};

use super::{noop_declare, push_sample};

const GROUP: &str = "submission";

fn latency() -> Classification {
    Classification::new(MeasurementUnit::Microseconds, MeasurementContext::Host)
}

fn setup_context() -> Result<HostContext, TestResult> {
    HostContext::new().map_err(|error| match error {
        BackendError::NotAvailable(_) | BackendError::NotCapable(_) => {
            log::warn!("host queue unavailable: {error}");
            TestResult::DeviceNotCapable
        }
        BackendError::QueueClosed => TestResult::Error,
    })
}

fn run_task_submission(arguments: &EmptyArguments, statistics: &mut Statistics) -> TestResult {
    let selector = latency();
    if statistics.is_noop() {
        return noop_declare(statistics, selector);
    }

    let context = match setup_context() {
        Ok(context) => context,
        Err(result) => return result,
    };
    let mut timer = Timer::new();

    // Warmup
    if context.submit_and_wait(|| {}).is_err() {
        return TestResult::Error;
    }

    for _ in 0..arguments.common.iterations.get() {
        timer.start();
        if context.submit_and_wait(|| {}).is_err() {
            return TestResult::Error;
        }
        timer.stop();
        if let Err(result) = push_sample(statistics, timer.elapsed(), selector) {
            return result;
        }
    }
    TestResult::Success
}

fn run_worker_wakeup(arguments: &EmptyArguments, statistics: &mut Statistics) -> TestResult {
    let selector = latency();
    if statistics.is_noop() {
        return noop_declare(statistics, selector);
    }

    let context = match setup_context() {
        Ok(context) => context,
        Err(result) => return result,
    };
    let flag = Arc::new(AtomicU64::new(0));
    let mut timer = Timer::new();

    // Warmup
    if context.submit_and_wait(|| {}).is_err() {
        return TestResult::Error;
    }

    for _ in 0..arguments.common.iterations.get() {
        flag.store(0, Ordering::SeqCst);
        let signal = Arc::clone(&flag);

        timer.start();
        if context
            .submit(move || signal.store(1, Ordering::Release))
            .is_err()
        {
            return TestResult::Error;
        }
        while flag.load(Ordering::Acquire) != 1 {
            std::hint::spin_loop();
        }
        timer.stop();

        // Drain the queue before the next submission.
        if context.submit_and_wait(|| {}).is_err() {
            return TestResult::Error;
        }
        if let Err(result) = push_sample(statistics, timer.elapsed(), selector) {
            return result;
        }
    }
    TestResult::Success
}

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        "TaskSubmission",
        GROUP,
        "measures time required to submit an empty task to the queue and wait for \
         its completion",
        || Box::new(EmptyArguments::new()),
    )?;
    registry.register_implementation::<EmptyArguments, _>(
        "TaskSubmission",
        Api::Host,
        false,
        run_task_submission,
    )?;

    registry.register(
        "WorkerWakeup",
        GROUP,
        "measures latency from task submission to the first store performed by the \
         worker",
        || Box::new(EmptyArguments::new()),
    )?;
    registry.register_implementation::<EmptyArguments, _>(
        "WorkerWakeup",
        Api::Host,
        false,
        run_worker_wakeup,
    )?;

    Ok(())
}
