//! Error types for the sectorbench measurement core

use sectorbench_platform::PlatformError;
use thiserror::Error;

/// Main error type for measurement operations.
///
/// Every variant is unrecoverable for the current run: nothing is retried
/// internally, and a failure aborts both directions. Cleanup of the test file
/// still happens during unwind.
#[derive(Error, Debug)]
pub enum Error {
    /// Sector-size or free-space query failed
    #[error("volume query failed: {0}")]
    VolumeQuery(#[source] PlatformError),

    /// Test file could not be opened in the requested mode
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path of the test file
        path: String,
        /// Underlying platform error
        source: PlatformError,
    },

    /// Test file could not be sized
    #[error("failed to size {path} to {bytes} bytes: {source}")]
    Resize {
        /// Path of the test file
        path: String,
        /// Requested length in bytes
        bytes: u64,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// Rewind to the start of a pass failed
    #[error("seek failed: {0}")]
    Seek(#[source] std::io::Error),

    /// Transfer completed but moved fewer bytes than requested
    #[error("partial transfer: requested {requested} bytes, transferred {transferred}")]
    PartialTransfer {
        /// Bytes requested for the transfer
        requested: usize,
        /// Bytes actually transferred
        transferred: usize,
    },

    /// OS-level failure during a transfer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Aligned transfer buffer could not be allocated
    #[error("buffer allocation failed: {0}")]
    Allocation(#[source] PlatformError),

    /// Requested size exceeds free space with autofit disabled
    #[error("requested size ({requested} B) exceeds free space ({free} B); shrink the request or re-enable autofit")]
    InsufficientSpace {
        /// Requested file size in bytes
        requested: u64,
        /// Available free bytes
        free: u64,
    },

    /// Statistics requested over zero samples
    #[error("no passes completed, nothing to summarize")]
    EmptySeries,
}

/// Result type alias using the measurement error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PartialTransfer {
            requested: 4096,
            transferred: 2048,
        };
        assert!(err.to_string().contains("4096"));
        assert!(err.to_string().contains("2048"));

        let err = Error::InsufficientSpace {
            requested: 5000,
            free: 1000,
        };
        assert!(err.to_string().contains("5000"));
        assert!(err.to_string().contains("1000"));

        let err = Error::EmptySeries;
        assert!(err.to_string().contains("nothing to summarize"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
