//! One complete measurement run
//!
//! Queries the volume once, plans once, then drives all write passes followed
//! by all read passes over a single shared test file. The device handle and
//! transfer buffer are scoped to a direction and released before the next one
//! starts; the test file is removed when the run ends, unless the caller keeps
//! it, even when the run fails.
//!
//! Execution is strictly synchronous and single-threaded. There is no timeout
//! on an individual transfer: a hung device call blocks the run indefinitely.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use sectorbench_platform::{
    query_geometry, AlignedBuffer, OpenMode, UnbufferedFile, VolumeGeometry,
};

use crate::engine::{read_pass, write_pass};
use crate::error::{Error, Result};
use crate::plan::{plan, TestPlan};
use crate::runner::{PassPolicy, PassSeries};
use crate::stats::{summarize, RunReport};

/// Well-known name of the test file created inside the target directory
pub const TEST_FILE_NAME: &str = "sectorbench_test.bin";

/// Byte every write pass fills the file with
pub const FILL_BYTE: u8 = 0xA5;

/// Caller-facing knobs for one measurement run
#[derive(Debug, Clone)]
pub struct MeasureConfig {
    /// Requested test file size in bytes; 0 with autofit means size-to-fit
    pub requested_bytes: u64,
    /// Requested transfer block size in bytes
    pub block_bytes: u64,
    /// Minimum passes per direction
    pub passes: u32,
    /// Minimum cumulative seconds per direction
    pub min_seconds: f64,
    /// Shrink the request to fit free space with 20% headroom
    pub autofit: bool,
    /// Keep the test file after the run
    pub keep_file: bool,
}

/// Throughput samples and summary for one direction
#[derive(Debug, Clone, Serialize)]
pub struct DirectionReport {
    /// Per-pass throughput in MB/s, in completion order
    pub samples: Vec<f64>,
    /// min/mean/max over the samples
    pub summary: RunReport,
}

/// Everything a run measured, plus the geometry and plan it ran under
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementReport {
    /// Test file path
    pub path: String,
    /// Sector size of the volume in bytes
    pub sector_size: u64,
    /// Free bytes at planning time
    pub free_bytes: u64,
    /// Planned test file size in bytes
    pub file_size: u64,
    /// Planned transfer block size in bytes
    pub block_size: u64,
    /// Write direction results
    pub write: DirectionReport,
    /// Read direction results
    pub read: DirectionReport,
}

/// Deletes the test file on drop unless told to keep it.
///
/// Cleanup is best-effort: a failed delete never masks the error that is
/// already unwinding.
struct TestFileGuard {
    path: PathBuf,
    keep: bool,
}

impl Drop for TestFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// A prepared measurement: geometry queried, plan derived, ready to run.
///
/// Splitting preparation from execution lets callers show the plan before the
/// (potentially long) timed passes start.
pub struct Measurement {
    path: PathBuf,
    geometry: VolumeGeometry,
    plan: TestPlan,
    policy: PassPolicy,
    keep_file: bool,
}

impl Measurement {
    /// Query `target_dir`'s volume and derive the plan for `config`.
    pub fn prepare(target_dir: &Path, config: &MeasureConfig) -> Result<Self> {
        let geometry = query_geometry(target_dir).map_err(Error::VolumeQuery)?;
        let plan = plan(
            config.requested_bytes,
            config.autofit,
            geometry.free_bytes,
            geometry.sector_size,
            config.block_bytes,
        )?;
        info!(
            file_size = plan.file_size,
            block_size = plan.block_size,
            sector_size = geometry.sector_size,
            "plan ready"
        );

        Ok(Self {
            path: target_dir.join(TEST_FILE_NAME),
            geometry,
            plan,
            policy: PassPolicy {
                passes: config.passes,
                min_seconds: config.min_seconds,
            },
            keep_file: config.keep_file,
        })
    }

    /// Volume geometry the plan was derived from
    pub fn geometry(&self) -> VolumeGeometry {
        self.geometry
    }

    /// The derived sizing plan
    pub fn plan(&self) -> TestPlan {
        self.plan
    }

    /// Path of the test file this run will use
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Execute all write passes, then all read passes, and summarize both.
    pub fn run(self) -> Result<MeasurementReport> {
        let _guard = TestFileGuard {
            path: self.path.clone(),
            keep: self.keep_file,
        };

        info!("starting write passes");
        let write_series = self.run_write_direction()?;
        info!("starting read passes");
        let read_series = self.run_read_direction()?;

        Ok(MeasurementReport {
            path: self.path.display().to_string(),
            sector_size: self.geometry.sector_size,
            free_bytes: self.geometry.free_bytes,
            file_size: self.plan.file_size,
            block_size: self.plan.block_size,
            write: direction_report(write_series)?,
            read: direction_report(read_series)?,
        })
    }

    fn run_write_direction(&self) -> Result<PassSeries> {
        let mut file =
            UnbufferedFile::open(&self.path, OpenMode::WriteThrough).map_err(|e| Error::Open {
                path: self.path.display().to_string(),
                source: e,
            })?;
        file.set_len(self.plan.file_size).map_err(|e| Error::Resize {
            path: self.path.display().to_string(),
            bytes: self.plan.file_size,
            source: e,
        })?;

        let mut buffer = self.allocate_buffer()?;
        buffer.fill(FILL_BYTE);

        self.policy.run(self.plan.file_size, || {
            write_pass(
                &mut file,
                buffer.as_slice(),
                self.plan.file_size,
                self.plan.block_size,
            )
        })
    }

    fn run_read_direction(&self) -> Result<PassSeries> {
        let mut file = UnbufferedFile::open(&self.path, OpenMode::Read).map_err(|e| Error::Open {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let mut buffer = self.allocate_buffer()?;

        self.policy.run(self.plan.file_size, || {
            read_pass(
                &mut file,
                buffer.as_mut_slice(),
                self.plan.file_size,
                self.plan.block_size,
            )
        })
    }

    fn allocate_buffer(&self) -> Result<AlignedBuffer> {
        AlignedBuffer::new(
            self.plan.block_size as usize,
            self.geometry.sector_size as usize,
        )
        .map_err(Error::Allocation)
    }
}

/// Prepare and run a full write-then-read measurement in `target_dir`.
pub fn measure(target_dir: &Path, config: &MeasureConfig) -> Result<MeasurementReport> {
    Measurement::prepare(target_dir, config)?.run()
}

fn direction_report(series: PassSeries) -> Result<DirectionReport> {
    let summary = summarize(&series)?;
    Ok(DirectionReport {
        samples: series.samples().to_vec(),
        summary,
    })
}
