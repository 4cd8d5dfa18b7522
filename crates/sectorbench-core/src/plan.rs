//! Sizing and alignment planning
//!
//! Turns a requested test size into a plan that is guaranteed runnable on the
//! volume: the file is a whole number of sector-aligned blocks, is never
//! smaller than one sector, and fits the available free space when autofit is
//! on. Alignment and the one-block floor always win over the literal request.

use serde::Serialize;
use tracing::debug;

use sectorbench_platform::{align_down, align_up};

use crate::error::{Error, Result};

/// Fraction of free space an autofit plan may consume
const AUTOFIT_HEADROOM: f64 = 0.8;

/// Validated file/block sizing for one measurement run.
///
/// Invariants: `block_size` is a positive multiple of the sector size,
/// `block_size <= file_size`, and `file_size` is a whole multiple of
/// `block_size`. Never mutated after planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestPlan {
    /// Test file size in bytes
    pub file_size: u64,
    /// Transfer block size in bytes
    pub block_size: u64,
}

/// Derive a runnable plan from the requested sizes and volume geometry.
///
/// With `autofit`, the request is capped at 80% of free space aligned down to
/// sector granularity; a zero or oversized request collapses to that cap.
/// Without autofit the request is taken literally and
/// [`Error::InsufficientSpace`] is returned when it exceeds free space.
pub fn plan(
    requested_bytes: u64,
    autofit: bool,
    free_bytes: u64,
    sector_size: u64,
    requested_block_bytes: u64,
) -> Result<TestPlan> {
    if !autofit && requested_bytes > free_bytes {
        return Err(Error::InsufficientSpace {
            requested: requested_bytes,
            free: free_bytes,
        });
    }

    let max_bytes = if autofit {
        align_down((free_bytes as f64 * AUTOFIT_HEADROOM) as u64, sector_size)
    } else {
        requested_bytes
    };

    let mut file_size = requested_bytes;
    if autofit && (requested_bytes == 0 || requested_bytes > max_bytes) {
        file_size = max_bytes;
    }

    // A volume cannot be tested below one sector.
    if file_size < sector_size {
        debug!(file_size, sector_size, "raising file size to one sector");
        file_size = sector_size;
    }

    let mut block_size = align_up(requested_block_bytes.max(1), sector_size);
    if block_size > file_size {
        debug!(block_size, file_size, "shrinking block to the file size");
        block_size = file_size;
    }

    // The file must be a whole number of blocks, with at least one block.
    file_size = align_down(file_size, block_size);
    if file_size == 0 {
        file_size = block_size;
    }

    Ok(TestPlan {
        file_size,
        block_size,
    })
}
