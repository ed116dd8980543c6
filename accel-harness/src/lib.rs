//! accel-harness: core infrastructure for accelerator API micro-benchmarks.
//!
//! Provides the typed argument system, the measurement classification and
//! statistics engine, the test catalog ([`Registry`]), and the dispatch
//! pipeline ([`runner`]) that runs registered benchmarks through the
//! noop/setup/warmup/measure/verify contract and settles a [`TestResult`]
//! per invocation.

pub mod api;
pub mod argument;
pub mod backend;
pub mod registry;
pub mod result;
pub mod runner;
pub mod statistics;
pub mod timer;

pub use api::{Api, ApiSelection};
pub use argument::{Argument, ArgumentContainer, ArgumentError, CommonArguments};
pub use registry::{Registry, RegistryError};
pub use result::TestResult;
pub use runner::{RunConfig, RunRecord, RunSummary};
pub use statistics::{
    Aggregate, Classification, MeasurementContext, MeasurementUnit, Statistics,
};
pub use timer::Timer;
