//! Multi-pass control
//!
//! A direction's passes repeat until both targets are met: a new pass starts
//! while the pass count is short **or** the cumulative time is short, so the
//! loop exits only when `passes_completed >= passes` **and**
//! `cumulative >= min_seconds`. The OR-entry/AND-exit pairing guarantees a
//! minimum sample count and a minimum total measurement time at once.

use std::time::Duration;

use tracing::debug;

use crate::error::Result;

const BYTES_PER_MIB: f64 = (1024 * 1024) as f64;

/// Pass-count and minimum-duration targets for one direction
#[derive(Debug, Clone, Copy)]
pub struct PassPolicy {
    /// Minimum number of passes to complete
    pub passes: u32,
    /// Minimum cumulative measurement time in seconds
    pub min_seconds: f64,
}

/// Ordered throughput samples collected for one direction.
///
/// Append-only while a run is in progress; insertion order is the pass order
/// and is preserved for per-pass reporting.
#[derive(Debug, Clone, Default)]
pub struct PassSeries {
    samples: Vec<f64>,
    cumulative: Duration,
}

impl PassSeries {
    /// Per-pass throughput in MB/s, in completion order
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of completed passes
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no pass has completed
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total wall-clock time spent in completed passes
    pub fn cumulative(&self) -> Duration {
        self.cumulative
    }
}

impl PassPolicy {
    /// Repeat `pass` until both targets are met, collecting one throughput
    /// sample per completed pass.
    ///
    /// `pass` performs one full traversal and returns its elapsed time; any
    /// error it reports aborts the whole run. With `passes == 0` and
    /// `min_seconds == 0.0` the body never executes and the returned series is
    /// empty — summarizing an empty series is an error, so callers should
    /// request at least one pass or a positive minimum duration.
    pub fn run<F>(&self, file_size: u64, mut pass: F) -> Result<PassSeries>
    where
        F: FnMut() -> Result<Duration>,
    {
        let mut series = PassSeries::default();
        while (series.len() as u32) < self.passes
            || series.cumulative.as_secs_f64() < self.min_seconds
        {
            let elapsed = pass()?;
            series.cumulative += elapsed;
            series.samples.push(throughput_mb_s(file_size, elapsed));
            debug!(
                pass = series.len(),
                secs = elapsed.as_secs_f64(),
                "pass complete"
            );
        }
        Ok(series)
    }
}

/// Throughput of one pass in MB/s; 0.0 for a degenerate zero-duration pass.
pub fn throughput_mb_s(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (bytes as f64 / BYTES_PER_MIB) / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_simple() {
        let sample = throughput_mb_s(4 * 1024 * 1024, Duration::from_secs(2));
        assert!((sample - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_zero_elapsed_is_zero() {
        assert_eq!(throughput_mb_s(4096, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_pass_count_target() {
        let policy = PassPolicy {
            passes: 3,
            min_seconds: 0.0,
        };
        let series = policy
            .run(1024 * 1024, || Ok(Duration::from_millis(100)))
            .unwrap();

        assert_eq!(series.len(), 3);
        let cumulative = series.cumulative().as_secs_f64();
        assert!((cumulative - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_min_duration_target() {
        let policy = PassPolicy {
            passes: 1,
            min_seconds: 0.45,
        };
        let series = policy
            .run(1024 * 1024, || Ok(Duration::from_millis(100)))
            .unwrap();

        // 5 passes of 0.1s are needed to reach 0.45s cumulative.
        assert_eq!(series.len(), 5);
        assert!(series.cumulative().as_secs_f64() >= 0.45);
    }

    #[test]
    fn test_termination_invariant() {
        for (passes, min_seconds) in [(0u32, 0.25f64), (4, 0.0), (2, 0.35), (6, 0.1)] {
            let policy = PassPolicy { passes, min_seconds };
            let series = policy
                .run(1024, || Ok(Duration::from_millis(100)))
                .unwrap();

            assert!(series.len() as u32 >= passes);
            assert!(series.cumulative().as_secs_f64() >= min_seconds);
        }
    }

    #[test]
    fn test_zero_targets_produce_empty_series() {
        let policy = PassPolicy {
            passes: 0,
            min_seconds: 0.0,
        };
        let mut calls = 0;
        let series = policy
            .run(1024, || {
                calls += 1;
                Ok(Duration::from_millis(1))
            })
            .unwrap();

        assert!(series.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_pass_error_aborts_run() {
        let policy = PassPolicy {
            passes: 5,
            min_seconds: 0.0,
        };
        let mut calls = 0;
        let result = policy.run(1024, || {
            calls += 1;
            if calls == 2 {
                Err(crate::error::Error::PartialTransfer {
                    requested: 1024,
                    transferred: 0,
                })
            } else {
                Ok(Duration::from_millis(1))
            }
        });

        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_samples_follow_pass_order() {
        let policy = PassPolicy {
            passes: 3,
            min_seconds: 0.0,
        };
        let mut durations = [100u64, 200, 400].into_iter();
        let series = policy
            .run(1024 * 1024, || {
                Ok(Duration::from_millis(durations.next().unwrap()))
            })
            .unwrap();

        let samples = series.samples();
        assert_eq!(samples.len(), 3);
        // Longer passes yield lower throughput, in order.
        assert!(samples[0] > samples[1]);
        assert!(samples[1] > samples[2]);
    }
}
