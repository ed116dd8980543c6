//! Backend API identifiers used for implementation dispatch.

use std::fmt;

use crate::argument::ArgEnum;

/// A backend API a benchmark implementation can target.
///
/// `Host` is the software reference backend and is always available.
/// The remaining variants identify accelerator runtimes whose context
/// providers are supplied by separate builds; benchmarks registered for
/// them are skipped when the backend is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Api {
    Host,
    OpenCl,
    LevelZero,
    Vulkan,
}

impl Api {
    pub const ALL: [Api; 4] = [Api::Host, Api::OpenCl, Api::LevelZero, Api::Vulkan];

    /// Stable name used on the command line and in reports.
    pub fn name(self) -> &'static str {
        match self {
            Api::Host => "Host",
            Api::OpenCl => "OpenCL",
            Api::LevelZero => "LevelZero",
            Api::Vulkan => "Vulkan",
        }
    }

    pub fn from_name(token: &str) -> Option<Api> {
        Api::ALL.iter().copied().find(|api| api.name() == token)
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which APIs a single invocation targets: one specific backend, or every
/// backend an implementation was registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSelection {
    All,
    Single(Api),
}

impl ArgEnum for ApiSelection {
    const VALUES: &'static [ApiSelection] = &[
        ApiSelection::All,
        ApiSelection::Single(Api::Host),
        ApiSelection::Single(Api::OpenCl),
        ApiSelection::Single(Api::LevelZero),
        ApiSelection::Single(Api::Vulkan),
    ];

    fn name(self) -> &'static str {
        match self {
            ApiSelection::All => "all",
            ApiSelection::Single(api) => api.name(),
        }
    }
}
