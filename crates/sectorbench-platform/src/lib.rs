//! # Sectorbench Platform
//!
//! Platform-specific adapters for unbuffered volume I/O.
//!
//! This crate is the capability layer the measurement core consumes: opening a
//! test file with cache-bypassing (and, for writes, write-through) semantics,
//! querying a volume's sector geometry and free space, and allocating transfer
//! buffers that satisfy the alignment rules unbuffered transfers impose.
//!
//! Each target operating system supplies its own open flags and geometry
//! queries behind the same types, so callers never name an OS API.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Platform-specific errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sector-size or free-space query failed
    #[error("volume query failed for {path}: {source}")]
    VolumeQuery {
        /// Path whose volume was queried
        path: String,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// Access denied when opening the test file
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Aligned transfer buffer could not be allocated
    #[error("cannot allocate {size} bytes aligned to {alignment}")]
    Allocation {
        /// Requested usable size in bytes
        size: usize,
        /// Requested alignment in bytes
        alignment: usize,
    },

    /// Operation not supported on this platform
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Sector geometry and free space of a mounted volume
#[derive(Debug, Clone, Copy)]
pub struct VolumeGeometry {
    /// Smallest addressable unit for unbuffered transfers, in bytes
    pub sector_size: u64,
    /// Bytes available to the calling user
    pub free_bytes: u64,
}

/// Access mode for an unbuffered open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read + write on a freshly created file; writes are durable on completion
    WriteThrough,
    /// Read-only on an existing file
    Read,
}

/// Query sector size and available free bytes for the volume holding `path`.
pub fn query_geometry(path: &Path) -> Result<VolumeGeometry> {
    let geometry = backend::query_geometry(path)?;
    tracing::debug!(
        sector_size = geometry.sector_size,
        free_bytes = geometry.free_bytes,
        "volume geometry"
    );
    Ok(geometry)
}

/// File handle whose transfers bypass the OS page cache.
///
/// Transfers through this handle must be sector-aligned in both buffer
/// address and length; use [`AlignedBuffer`] for the transfer buffer.
/// Closing the handle is dropping it.
pub struct UnbufferedFile {
    file: File,
    path: PathBuf,
}

impl UnbufferedFile {
    /// Open `path` for unbuffered transfers in the given mode.
    ///
    /// [`OpenMode::WriteThrough`] creates the file, truncating any previous
    /// contents; [`OpenMode::Read`] requires it to exist.
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        let mut options = OpenOptions::new();
        match mode {
            OpenMode::WriteThrough => {
                options.read(true).write(true).create(true).truncate(true);
            }
            OpenMode::Read => {
                options.read(true);
            }
        }
        backend::configure(&mut options, mode);

        let file = options.open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                PlatformError::PermissionDenied(format!("cannot open {}: {}", path.display(), e))
            } else {
                PlatformError::Io(e)
            }
        })?;
        backend::post_open(&file, mode)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Truncate or extend the file to exactly `bytes`.
    pub fn set_len(&self, bytes: u64) -> std::io::Result<()> {
        self.file.set_len(bytes)
    }

    /// Path this handle was opened on
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for UnbufferedFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for UnbufferedFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Seek for UnbufferedFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

/// Transfer buffer whose start address satisfies an alignment requirement.
///
/// Unbuffered transfers reject misaligned buffers, so the allocation
/// over-reserves by one alignment unit and hands out slices starting at the
/// first aligned offset.
pub struct AlignedBuffer {
    data: Vec<u8>,
    offset: usize,
    len: usize,
}

impl AlignedBuffer {
    /// Allocate `len` usable bytes aligned to `alignment`.
    pub fn new(len: usize, alignment: usize) -> Result<Self> {
        if len == 0 || alignment == 0 {
            return Err(PlatformError::Allocation {
                size: len,
                alignment,
            });
        }
        let total = len
            .checked_add(alignment)
            .ok_or(PlatformError::Allocation {
                size: len,
                alignment,
            })?;
        let data = vec![0u8; total];
        let base = data.as_ptr() as u64;
        let offset = (align_up(base, alignment as u64) - base) as usize;
        Ok(Self { data, offset, len })
    }

    /// Usable length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the buffer holds no usable bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Aligned view of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.offset..self.offset + self.len]
    }

    /// Aligned mutable view of the buffer
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let offset = self.offset;
        let len = self.len;
        &mut self.data[offset..offset + len]
    }

    /// Fill every usable byte with `byte`.
    pub fn fill(&mut self, byte: u8) {
        self.as_mut_slice().fill(byte);
    }
}

/// Align `value` up to the next multiple of `multiple`.
///
/// `multiple` need not be a power of two. A zero `multiple` returns `value`
/// unchanged.
#[inline]
pub fn align_up(value: u64, multiple: u64) -> u64 {
    if multiple == 0 {
        return value;
    }
    value.div_ceil(multiple) * multiple
}

/// Align `value` down to the previous multiple of `multiple`.
///
/// `multiple` need not be a power of two. A zero `multiple` returns `value`
/// unchanged.
#[inline]
pub fn align_down(value: u64, multiple: u64) -> u64 {
    if multiple == 0 {
        return value;
    }
    value / multiple * multiple
}

/// Check whether `value` is a multiple of `multiple`.
#[inline]
pub fn is_aligned(value: u64, multiple: u64) -> bool {
    if multiple == 0 {
        return true;
    }
    value % multiple == 0
}

// Platform-specific backends
cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod linux;
        use linux as backend;
    } else if #[cfg(target_os = "macos")] {
        mod macos;
        use macos as backend;
    } else if #[cfg(windows)] {
        mod windows;
        use windows as backend;
    } else {
        mod unsupported;
        use unsupported as backend;
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
