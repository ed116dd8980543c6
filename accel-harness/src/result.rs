//! The closed set of terminal results a benchmark invocation can produce,
//! with the reporting metadata each one carries.

/// Terminal result of one benchmark invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestResult {
    /// Measured values are valid; results live in the statistics engine.
    Success,
    /// Unexpected failure during execution.
    Error,
    /// Required extension entry point unavailable.
    DriverFunctionNotFound,
    /// Device lacks a required feature; not a defect.
    DeviceNotCapable,
    /// Selected backend API cannot express this benchmark.
    ApiNotCapable,
    /// Required device-code binary missing from the deployment.
    KernelNotFound,
    /// No implementation registered for the requested API.
    SkippedApi,
    /// API excluded from this build or process.
    UnsupportedApi,
    /// Catalog has metadata but no implementation compiled in.
    NoImplementation,
    /// Vendor extension absent.
    IntelExtensionsRequired,
    /// Argument parsing or validation failed.
    InvalidArgs,
    /// Noop path taken; classification declared, nothing measured.
    Nooped,
    /// Excluded by a run-time name filter before any setup.
    FilteredOut,
    /// Result produced but failed the correctness check.
    VerificationFail,
    /// Backend-side compilation of device code failed.
    KernelBuildError,
}

/// Reporting metadata attached to every non-Success result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestResultInfo {
    /// Short status printed in result lines.
    pub message: &'static str,
    /// Print this result when running a single benchmark.
    pub print_single: bool,
    /// Print this result when summarizing a batch over the whole catalog.
    pub print_batch: bool,
    /// Counts as skipped rather than failed in pass/fail accounting.
    pub skipped: bool,
}

const fn info(
    message: &'static str,
    print_single: bool,
    print_batch: bool,
    skipped: bool,
) -> TestResultInfo {
    TestResultInfo {
        message,
        print_single,
        print_batch,
        skipped,
    }
}

impl TestResult {
    /// Reporting metadata for this result.
    ///
    /// Returns `None` for [`TestResult::Success`]: successful runs report
    /// through the statistics engine, and asking for their metadata is a
    /// harness defect (logged as such).
    pub fn info(self) -> Option<TestResultInfo> {
        let info = match self {
            TestResult::Success => {
                log::warn!(
                    "reporting metadata requested for Success; successful runs \
                     report through the statistics engine"
                );
                return None;
            }
            TestResult::Error => info("ERROR", true, true, false),
            TestResult::DriverFunctionNotFound => info("NO_SUPPORT", true, true, true),
            TestResult::DeviceNotCapable => info("NO_SUPPORT", true, false, true),
            TestResult::ApiNotCapable => info("NO_SUPPORT (API)", true, false, true),
            TestResult::KernelNotFound => info("MISSING_KERNEL", true, true, true),
            TestResult::SkippedApi => info("SKIPPED", false, false, true),
            TestResult::UnsupportedApi => info("SKIPPED", false, false, true),
            TestResult::NoImplementation => info("NO_IMPLEMENT", true, false, true),
            TestResult::IntelExtensionsRequired => info("NO_SUPPORT", true, false, true),
            TestResult::InvalidArgs => info("INVALID_ARGS", true, true, true),
            TestResult::Nooped => info("NOOP", true, true, true),
            TestResult::FilteredOut => info("FILTERED_OUT", true, false, true),
            TestResult::VerificationFail => info("VERIF_FAIL", true, true, false),
            TestResult::KernelBuildError => info("KERNEL_BUILD_ERROR", true, true, false),
        };
        Some(info)
    }

    pub fn is_success(self) -> bool {
        self == TestResult::Success
    }

    /// Counts as skipped in pass/fail accounting.
    pub fn is_skipped(self) -> bool {
        self.info().map(|i| i.skipped).unwrap_or(false)
    }

    /// A genuine defect: neither success nor an expected capability gap.
    pub fn is_failure(self) -> bool {
        !self.is_success() && !self.is_skipped()
    }
}
