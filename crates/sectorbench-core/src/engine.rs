//! Timed single-pass transfer loops
//!
//! One pass is a full sequential traversal of the test file. The loop is
//! deliberately bare: rewind, stamp the clock, move fixed-size blocks, stamp
//! again. Anything that could perturb the timing (progress callbacks, retries,
//! content checks) stays out of it.
//!
//! The functions are generic over the std I/O traits so they run against an
//! in-memory target in tests and an unbuffered device handle in production.
//! Callers are responsible for opening the handle in the right mode and, for
//! writes, sizing the file first.

use std::io::{Read, Seek, SeekFrom, Write};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Run one full write pass over `file_size` bytes of `target`.
///
/// `pattern` must hold at least `block_size` bytes; each transfer writes
/// `min(block_size, remaining)` of it. A transfer that completes short of the
/// requested count aborts with [`Error::PartialTransfer`] — a silently short
/// write would invalidate the throughput number.
pub fn write_pass<W>(
    target: &mut W,
    pattern: &[u8],
    file_size: u64,
    block_size: u64,
) -> Result<Duration>
where
    W: Write + Seek,
{
    debug_assert!(pattern.len() as u64 >= block_size);
    target.seek(SeekFrom::Start(0)).map_err(Error::Seek)?;

    let start = Instant::now();
    let mut remaining = file_size;
    while remaining > 0 {
        let chunk = block_size.min(remaining) as usize;
        let written = target.write(&pattern[..chunk])?;
        if written != chunk {
            return Err(Error::PartialTransfer {
                requested: chunk,
                transferred: written,
            });
        }
        remaining -= chunk as u64;
    }
    Ok(start.elapsed())
}

/// Run one full read pass over `file_size` bytes of `target`.
///
/// Symmetric with [`write_pass`]: `buffer` must hold at least `block_size`
/// bytes, every transfer must complete in full, and the elapsed wall-clock
/// time of the whole traversal is returned.
pub fn read_pass<R>(
    target: &mut R,
    buffer: &mut [u8],
    file_size: u64,
    block_size: u64,
) -> Result<Duration>
where
    R: Read + Seek,
{
    debug_assert!(buffer.len() as u64 >= block_size);
    target.seek(SeekFrom::Start(0)).map_err(Error::Seek)?;

    let start = Instant::now();
    let mut remaining = file_size;
    while remaining > 0 {
        let chunk = block_size.min(remaining) as usize;
        let transferred = target.read(&mut buffer[..chunk])?;
        if transferred != chunk {
            return Err(Error::PartialTransfer {
                requested: chunk,
                transferred,
            });
        }
        remaining -= chunk as u64;
    }
    Ok(start.elapsed())
}
