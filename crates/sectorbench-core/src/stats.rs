//! Statistics over a pass series

use serde::Serialize;

use crate::error::{Error, Result};
use crate::runner::PassSeries;

/// Extremes and arithmetic mean of a direction's throughput samples, in MB/s
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunReport {
    /// Slowest pass
    pub min: f64,
    /// Unweighted arithmetic mean of all passes
    pub mean: f64,
    /// Fastest pass
    pub max: f64,
}

/// Reduce a series to min/mean/max.
///
/// The mean is per-pass, not time-weighted, matching the per-pass reporting
/// granularity. An empty series is [`Error::EmptySeries`], not a zero report.
pub fn summarize(series: &PassSeries) -> Result<RunReport> {
    let samples = series.samples();
    if samples.is_empty() {
        return Err(Error::EmptySeries);
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &sample in samples {
        min = min.min(sample);
        max = max.max(sample);
        sum += sample;
    }

    Ok(RunReport {
        min,
        mean: sum / samples.len() as f64,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::PassPolicy;
    use std::time::Duration;

    fn series_from_millis(millis: &[u64]) -> PassSeries {
        let policy = PassPolicy {
            passes: millis.len() as u32,
            min_seconds: 0.0,
        };
        let mut iter = millis.iter().copied();
        policy
            .run(1024 * 1024, || {
                Ok(Duration::from_millis(iter.next().unwrap()))
            })
            .unwrap()
    }

    #[test]
    fn test_summarize_single_sample() {
        let series = series_from_millis(&[500]);
        let report = summarize(&series).unwrap();

        assert!((report.min - 2.0).abs() < 1e-9);
        assert!((report.mean - 2.0).abs() < 1e-9);
        assert!((report.max - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_min_mean_max() {
        // 1 MiB over 100/250/500 ms: 10, 4, 2 MB/s
        let series = series_from_millis(&[100, 250, 500]);
        let report = summarize(&series).unwrap();

        assert!((report.min - 2.0).abs() < 1e-9);
        assert!((report.max - 10.0).abs() < 1e-9);
        assert!((report.mean - (10.0 + 4.0 + 2.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty_series_is_error() {
        let series = PassSeries::default();
        assert!(matches!(summarize(&series), Err(Error::EmptySeries)));
    }

    #[test]
    fn test_mean_is_not_time_weighted() {
        // Two passes, one fast and one slow; the per-pass mean weighs them
        // equally even though the slow pass dominates wall-clock time.
        let series = series_from_millis(&[100, 1000]);
        let report = summarize(&series).unwrap();

        let fast = 10.0;
        let slow = 1.0;
        assert!((report.mean - (fast + slow) / 2.0).abs() < 1e-9);
    }
}
