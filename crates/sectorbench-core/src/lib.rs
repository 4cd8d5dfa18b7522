//! # Sectorbench Core
//!
//! Measurement engine for the sectorbench disk throughput tool.
//!
//! ## Modules
//!
//! - `plan`: turns a requested size into a sector-aligned, space-checked plan
//! - `engine`: timed single-pass transfer loops over a file-like target
//! - `runner`: multi-pass / minimum-duration control
//! - `stats`: min/mean/max aggregation over a direction's samples
//! - `measure`: one complete write-then-read run over a shared test file
//! - `error`: error types and result alias
//!
//! ## Example
//!
//! ```ignore
//! use sectorbench_core::{measure, MeasureConfig};
//!
//! let config = MeasureConfig {
//!     requested_bytes: 0, // size-to-fit
//!     block_bytes: 1024 * 1024,
//!     passes: 3,
//!     min_seconds: 0.0,
//!     autofit: true,
//!     keep_file: false,
//! };
//! let report = measure(std::path::Path::new("/mnt/flash"), &config)?;
//! println!("write mean: {:.2} MB/s", report.write.summary.mean);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod measure;
pub mod plan;
pub mod runner;
pub mod stats;

pub use engine::{read_pass, write_pass};
pub use error::{Error, Result};
pub use measure::{
    measure, DirectionReport, MeasureConfig, Measurement, MeasurementReport, FILL_BYTE,
    TEST_FILE_NAME,
};
pub use plan::{plan, TestPlan};
pub use runner::{throughput_mb_s, PassPolicy, PassSeries};
pub use stats::{summarize, RunReport};
