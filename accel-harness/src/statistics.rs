//! Measurement classification and the sample accumulation / reduction
//! engine.
//!
//! A [`Statistics`] instance belongs to exactly one benchmark execution and
//! holds exactly one [`Classification`] for its lifetime. Throughput samples
//! are normalized at push time (`bytes / duration`), so reductions always
//! operate on per-iteration rates.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default relative tolerance around the median for the robust mean.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Unit a sample is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementUnit {
    Microseconds,
    Nanoseconds,
    GigabytesPerSecond,
    Unknown,
}

impl MeasurementUnit {
    pub fn label(self) -> &'static str {
        match self {
            MeasurementUnit::Microseconds => "us",
            MeasurementUnit::Nanoseconds => "ns",
            MeasurementUnit::GigabytesPerSecond => "GB/s",
            MeasurementUnit::Unknown => "?",
        }
    }
}

/// Clock a sample was observed on: the host timeline or device-side
/// timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementContext {
    Host,
    Device,
    Unknown,
}

impl MeasurementContext {
    pub fn label(self) -> &'static str {
        match self {
            MeasurementContext::Host => "host",
            MeasurementContext::Device => "device",
            MeasurementContext::Unknown => "?",
        }
    }
}

/// The (unit, context) pair attached to every sample of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub unit: MeasurementUnit,
    pub context: MeasurementContext,
}

impl Classification {
    pub fn new(unit: MeasurementUnit, context: MeasurementContext) -> Self {
        Self { unit, context }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.unit.label(), self.context.label())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatisticsError {
    #[error("classification mismatch: session is {expected}, push was {actual}")]
    ClassificationMismatch {
        expected: Classification,
        actual: Classification,
    },
    #[error("throughput classification requires a byte weight")]
    MissingByteWeight,
    #[error("cannot derive a rate from a zero-length duration")]
    ZeroDuration,
    #[error("samples cannot be recorded in a noop run")]
    NoopPush,
}

/// Aggregates reduced from the accumulated samples of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregate {
    pub mean: f64,
    pub median: f64,
    /// Mean over samples within the tolerance band around the median.
    pub robust_mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
    pub sample_count: usize,
    pub trimmed: usize,
}

/// Sample accumulator for a single benchmark execution.
pub struct Statistics {
    noop: bool,
    tolerance: f64,
    classification: Option<Classification>,
    samples: Vec<f64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::configured(false, DEFAULT_TOLERANCE)
    }

    /// A declare-only session: the classification is recorded, samples are
    /// rejected. Used by discovery passes to enumerate measurement shapes
    /// without touching any backend.
    pub fn noop() -> Self {
        Self::configured(true, DEFAULT_TOLERANCE)
    }

    pub fn configured(noop: bool, tolerance: f64) -> Self {
        Self {
            noop,
            tolerance,
            classification: None,
            samples: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.noop
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Record the classification this run would measure under, with zero
    /// samples.
    pub fn declare_classification(
        &mut self,
        classification: Classification,
    ) -> Result<(), StatisticsError> {
        self.bind_classification(classification)
    }

    /// Append one time sample under the session classification.
    pub fn push_value(
        &mut self,
        elapsed: Duration,
        classification: Classification,
    ) -> Result<(), StatisticsError> {
        self.push(elapsed, None, classification)
    }

    /// Append one sample carrying the bytes processed in that iteration.
    /// Under a throughput unit the stored value is `bytes / elapsed`.
    pub fn push_value_with_bytes(
        &mut self,
        elapsed: Duration,
        bytes: u64,
        classification: Classification,
    ) -> Result<(), StatisticsError> {
        self.push(elapsed, Some(bytes), classification)
    }

    fn push(
        &mut self,
        elapsed: Duration,
        bytes: Option<u64>,
        classification: Classification,
    ) -> Result<(), StatisticsError> {
        if self.noop {
            return Err(StatisticsError::NoopPush);
        }
        self.bind_classification(classification)?;

        let value = match classification.unit {
            MeasurementUnit::Microseconds => elapsed.as_secs_f64() * 1e6,
            MeasurementUnit::Nanoseconds => elapsed.as_secs_f64() * 1e9,
            MeasurementUnit::GigabytesPerSecond => {
                let bytes = bytes.ok_or(StatisticsError::MissingByteWeight)?;
                let nanos = elapsed.as_nanos();
                if nanos == 0 {
                    return Err(StatisticsError::ZeroDuration);
                }
                // bytes per nanosecond == decimal gigabytes per second
                bytes as f64 / nanos as f64
            }
            MeasurementUnit::Unknown => elapsed.as_secs_f64(),
        };
        self.samples.push(value);
        Ok(())
    }

    fn bind_classification(
        &mut self,
        classification: Classification,
    ) -> Result<(), StatisticsError> {
        match self.classification {
            None => {
                self.classification = Some(classification);
                Ok(())
            }
            Some(existing) if existing == classification => Ok(()),
            Some(existing) => Err(StatisticsError::ClassificationMismatch {
                expected: existing,
                actual: classification,
            }),
        }
    }

    /// Reduce the accumulated samples. `None` when no samples were pushed,
    /// which distinguishes an intentionally skipped run from a measured
    /// zero.
    pub fn reduce(&self) -> Option<Aggregate> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let median = median_of_sorted(&sorted);
        let band = self.tolerance * median.abs();
        let kept: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| (v - median).abs() <= band)
            .collect();
        // A wide-spread even-count run can empty the band entirely; fall
        // back to the full set rather than reporting on nothing.
        let robust_base: &[f64] = if kept.is_empty() { &sorted } else { &kept };
        let trimmed = sorted.len() - robust_base.len();

        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let robust_mean = robust_base.iter().sum::<f64>() / robust_base.len() as f64;
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let stddev = if sorted.len() > 1 {
            let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (sorted.len() - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Aggregate {
            mean,
            median,
            robust_mean,
            min,
            max,
            stddev,
            sample_count: sorted.len(),
            trimmed,
        })
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const US_HOST: Classification =
        Classification {
            unit: MeasurementUnit::Microseconds,
            context: MeasurementContext::Host,
        };

    const GBS_HOST: Classification =
        Classification {
            unit: MeasurementUnit::GigabytesPerSecond,
            context: MeasurementContext::Host,
        };

    #[test]
    fn test_median_odd() {
        let mut stats = Statistics::new();
        for ms in [3, 1, 5, 2, 4] {
            stats.push_value(Duration::from_millis(ms), US_HOST).unwrap();
        }
        let agg = stats.reduce().unwrap();
        assert!((agg.median - 3000.0).abs() < 1e-9);
        assert_eq!(agg.sample_count, 5);
    }

    #[test]
    fn test_median_even() {
        let mut stats = Statistics::new();
        for ms in [4, 1, 3, 2] {
            stats.push_value(Duration::from_millis(ms), US_HOST).unwrap();
        }
        let agg = stats.reduce().unwrap();
        // Average of the 2nd and 3rd sorted values.
        assert!((agg.median - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_microsecond_scaling() {
        let mut stats = Statistics::new();
        stats
            .push_value(Duration::from_micros(250), US_HOST)
            .unwrap();
        let agg = stats.reduce().unwrap();
        assert!((agg.mean - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_rates_are_per_sample() {
        let mut stats = Statistics::new();
        // 1e9 bytes in 1s -> 1 GB/s; 1e9 bytes in 0.5s -> 2 GB/s.
        stats
            .push_value_with_bytes(Duration::from_secs(1), 1_000_000_000, GBS_HOST)
            .unwrap();
        stats
            .push_value_with_bytes(Duration::from_millis(500), 1_000_000_000, GBS_HOST)
            .unwrap();
        let agg = stats.reduce().unwrap();
        // Mean of per-sample rates (1.5), not total bytes over total time
        // (which would be ~1.33).
        assert!((agg.mean - 1.5).abs() < 1e-9, "mean={}", agg.mean);
    }

    #[test]
    fn test_throughput_weight_may_vary_per_iteration() {
        let mut stats = Statistics::new();
        stats
            .push_value_with_bytes(Duration::from_secs(1), 2_000_000_000, GBS_HOST)
            .unwrap();
        stats
            .push_value_with_bytes(Duration::from_secs(1), 4_000_000_000, GBS_HOST)
            .unwrap();
        let agg = stats.reduce().unwrap();
        assert!((agg.mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_requires_weight() {
        let mut stats = Statistics::new();
        let err = stats
            .push_value(Duration::from_secs(1), GBS_HOST)
            .unwrap_err();
        assert_eq!(err, StatisticsError::MissingByteWeight);
    }

    #[test]
    fn test_classification_mismatch_is_error() {
        let mut stats = Statistics::new();
        stats.push_value(Duration::from_secs(1), US_HOST).unwrap();
        let err = stats
            .push_value_with_bytes(Duration::from_secs(1), 10, GBS_HOST)
            .unwrap_err();
        assert!(matches!(
            err,
            StatisticsError::ClassificationMismatch { .. }
        ));
        assert_eq!(stats.sample_count(), 1);
    }

    #[test]
    fn test_noop_declares_without_samples() {
        let mut stats = Statistics::noop();
        stats.declare_classification(US_HOST).unwrap();
        assert_eq!(stats.classification(), Some(US_HOST));
        assert_eq!(stats.sample_count(), 0);
        assert!(stats.reduce().is_none());
    }

    #[test]
    fn test_noop_rejects_samples() {
        let mut stats = Statistics::noop();
        stats.declare_classification(US_HOST).unwrap();
        let err = stats
            .push_value(Duration::from_secs(1), US_HOST)
            .unwrap_err();
        assert_eq!(err, StatisticsError::NoopPush);
    }

    #[test]
    fn test_zero_samples_reduce_to_none() {
        let stats = Statistics::new();
        assert!(stats.reduce().is_none());
    }

    #[test]
    fn test_robust_mean_discards_stragglers() {
        let mut stats = Statistics::configured(false, 0.5);
        for us in [100, 101, 99, 102, 98, 100, 1000] {
            stats.push_value(Duration::from_micros(us), US_HOST).unwrap();
        }
        let agg = stats.reduce().unwrap();
        assert_eq!(agg.trimmed, 1);
        assert!(agg.robust_mean < 110.0, "robust={}", agg.robust_mean);
        assert!(agg.mean > 200.0, "mean={}", agg.mean);
    }

    #[test]
    fn test_robust_mean_falls_back_when_band_empties() {
        // Two samples far apart: both fall outside the band around their
        // averaged median.
        let mut stats = Statistics::configured(false, 0.1);
        stats.push_value(Duration::from_micros(1), US_HOST).unwrap();
        stats
            .push_value(Duration::from_micros(1000), US_HOST)
            .unwrap();
        let agg = stats.reduce().unwrap();
        assert_eq!(agg.trimmed, 0);
        assert!((agg.robust_mean - agg.mean).abs() < 1e-9);
    }

    #[test]
    fn test_min_max_stddev() {
        let mut stats = Statistics::new();
        for us in [1, 2, 3, 4, 5] {
            stats.push_value(Duration::from_micros(us), US_HOST).unwrap();
        }
        let agg = stats.reduce().unwrap();
        assert!((agg.min - 1.0).abs() < 1e-9);
        assert!((agg.max - 5.0).abs() < 1e-9);
        assert!((agg.stddev - 2.5f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_declare_then_push_same_classification() {
        let mut stats = Statistics::new();
        stats.declare_classification(US_HOST).unwrap();
        stats.push_value(Duration::from_micros(5), US_HOST).unwrap();
        assert_eq!(stats.sample_count(), 1);
    }

    #[test]
    fn test_declare_conflicting_classification_fails() {
        let mut stats = Statistics::new();
        stats.declare_classification(US_HOST).unwrap();
        assert!(stats.declare_classification(GBS_HOST).is_err());
    }
}
