//! The test catalog: benchmark metadata plus per-API runnable
//! implementations.
//!
//! A [`Registry`] is an owned value populated by an explicit, ordered
//! registration manifest at startup and immutable afterwards. Both
//! registration surfaces must succeed before a benchmark is runnable:
//! metadata (name, group, help, argument prototype) and at least one
//! (name, API) implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::Api;
use crate::argument::ArgumentContainer;
use crate::result::TestResult;
use crate::statistics::Statistics;

/// The fixed callable signature every benchmark implementation has.
pub type BenchmarkFn =
    Arc<dyn Fn(&dyn ArgumentContainer, &mut Statistics) -> TestResult + Send + Sync>;

/// Constructor for a benchmark's argument container.
pub type ArgumentPrototype = fn() -> Box<dyn ArgumentContainer>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("benchmark '{0}' is already registered")]
    DuplicateBenchmark(String),
    #[error("implementation for '{0}' on {1} is already registered")]
    DuplicateImplementation(String, Api),
    #[error("no metadata registered for benchmark '{0}'")]
    UnknownBenchmark(String),
}

/// One registered implementation of a benchmark for one API.
pub struct Implementation {
    run: BenchmarkFn,
    /// Permitted to run even when no device context could be created for
    /// its API (capability-probing benchmarks).
    pub runs_without_context: bool,
}

impl Implementation {
    pub fn run(&self, arguments: &dyn ArgumentContainer, statistics: &mut Statistics) -> TestResult {
        (self.run)(arguments, statistics)
    }

    pub fn callable(&self) -> BenchmarkFn {
        Arc::clone(&self.run)
    }
}

/// Metadata and implementations for one benchmark name.
pub struct CatalogEntry {
    name: String,
    group: String,
    help: String,
    prototype: ArgumentPrototype,
    implementations: BTreeMap<Api, Implementation>,
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Construct a fresh argument container for one invocation.
    pub fn new_arguments(&self) -> Box<dyn ArgumentContainer> {
        (self.prototype)()
    }

    pub fn implementation(&self, api: Api) -> Option<&Implementation> {
        self.implementations.get(&api)
    }

    /// APIs an implementation was registered for, in `Api` order.
    pub fn apis(&self) -> impl Iterator<Item = Api> + '_ {
        self.implementations.keys().copied()
    }

    pub fn implementation_count(&self) -> usize {
        self.implementations.len()
    }
}

/// Process catalog mapping benchmark names to entries, ordered by name.
pub struct Registry {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a benchmark's metadata. Registering the same name twice is
    /// a configuration error.
    pub fn register(
        &mut self,
        name: &str,
        group: &str,
        help: &str,
        prototype: ArgumentPrototype,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(name) {
            return Err(RegistryError::DuplicateBenchmark(name.to_string()));
        }
        log::debug!("registering benchmark '{name}' (group '{group}')");
        self.entries.insert(
            name.to_string(),
            CatalogEntry {
                name: name.to_string(),
                group: group.to_string(),
                help: help.to_string(),
                prototype,
                implementations: BTreeMap::new(),
            },
        );
        Ok(())
    }

    /// Register an implementation for (name, API). The callable receives
    /// the container type `C` declared with the metadata; a mismatched
    /// container at dispatch time is a harness defect and yields `Error`.
    pub fn register_implementation<C, F>(
        &mut self,
        name: &str,
        api: Api,
        runs_without_context: bool,
        run: F,
    ) -> Result<(), RegistryError>
    where
        C: ArgumentContainer,
        F: Fn(&C, &mut Statistics) -> TestResult + Send + Sync + 'static,
    {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownBenchmark(name.to_string()))?;
        if entry.implementations.contains_key(&api) {
            return Err(RegistryError::DuplicateImplementation(
                name.to_string(),
                api,
            ));
        }

        let benchmark = name.to_string();
        let wrapped: BenchmarkFn =
            Arc::new(move |arguments: &dyn ArgumentContainer, statistics: &mut Statistics| {
                match arguments.downcast_ref::<C>() {
                    Some(typed) => run(typed, statistics),
                    None => {
                        log::error!("argument container type mismatch for '{benchmark}'");
                        TestResult::Error
                    }
                }
            });
        entry.implementations.insert(
            api,
            Implementation {
                run: wrapped,
                runs_without_context,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Entries ordered by benchmark name.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
