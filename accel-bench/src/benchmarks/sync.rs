//! Synchronization primitive benchmarks.

use std::any::Any;
use std::sync::{Arc, Barrier};
use std::time::Duration;

use accel_harness::argument::{
    Argument, CommonArguments, PositiveIntegerArgument,
};
use accel_harness::statistics::{Classification, MeasurementContext, MeasurementUnit};
use accel_harness::{Api, ArgumentContainer, Registry, RegistryError, Statistics, TestResult, Timer};

use super::{noop_declare, push_sample};

const GROUP: &str = "sync";

fn latency() -> Classification {
    Classification::new(MeasurementUnit::Microseconds, MeasurementContext::Host)
}

pub struct BarrierCrossingArguments {
    pub common: CommonArguments,
    pub threads: PositiveIntegerArgument,
}

impl BarrierCrossingArguments {
    pub fn new() -> Self {
        Self {
            common: CommonArguments::new(),
            threads: PositiveIntegerArgument::with_default(
                "threads",
                "Number of threads meeting at the barrier",
                4,
            ),
        }
    }
}

impl ArgumentContainer for BarrierCrossingArguments {
    fn common(&self) -> &CommonArguments {
        &self.common
    }

    fn arguments(&self) -> Vec<&dyn Argument> {
        let mut args = self.common.arguments();
        args.push(&self.threads);
        args
    }

    fn arguments_mut(&mut self) -> Vec<&mut dyn Argument> {
        let mut args = self.common.arguments_mut();
        args.push(&mut self.threads);
        args
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn run_barrier_crossing(
    arguments: &BarrierCrossingArguments,
    statistics: &mut Statistics,
) -> TestResult {
    let selector = latency();
    if statistics.is_noop() {
        return noop_declare(statistics, selector);
    }

    let threads = arguments.threads.get() as usize;
    let iterations = arguments.common.iterations.get();
    // One extra crossing serves as warmup.
    let crossings = iterations + 1;

    let barrier = Arc::new(Barrier::new(threads));
    let mut workers = Vec::with_capacity(threads - 1);
    for _ in 1..threads {
        let barrier = Arc::clone(&barrier);
        workers.push(std::thread::spawn(move || {
            for _ in 0..crossings {
                barrier.wait();
            }
        }));
    }

    // Warmup
    barrier.wait();

    let mut timer = Timer::new();
    let mut elapsed: Vec<Duration> = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        timer.start();
        barrier.wait();
        timer.stop();
        elapsed.push(timer.elapsed());
    }

    // Join before recording so worker threads never outlive a failed run.
    let mut joined_ok = true;
    for worker in workers {
        joined_ok &= worker.join().is_ok();
    }
    if !joined_ok {
        return TestResult::Error;
    }

    for duration in elapsed {
        if let Err(result) = push_sample(statistics, duration, selector) {
            return result;
        }
    }
    TestResult::Success
}

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        "BarrierCrossing",
        GROUP,
        "measures time required for all participating threads to cross a shared \
         barrier",
        || Box::new(BarrierCrossingArguments::new()),
    )?;
    registry.register_implementation::<BarrierCrossingArguments, _>(
        "BarrierCrossing",
        Api::Host,
        false,
        run_barrier_crossing,
    )?;
    Ok(())
}
