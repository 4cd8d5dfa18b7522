//! Fallback backend for platforms without an unbuffered I/O adapter

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::{OpenMode, PlatformError, Result, VolumeGeometry};

pub(crate) fn configure(_options: &mut OpenOptions, _mode: OpenMode) {}

pub(crate) fn post_open(_file: &File, _mode: OpenMode) -> Result<()> {
    Err(PlatformError::NotSupported(
        "unbuffered I/O is not available on this platform".to_string(),
    ))
}

pub(crate) fn query_geometry(_path: &Path) -> Result<VolumeGeometry> {
    Err(PlatformError::NotSupported(
        "volume geometry queries are not available on this platform".to_string(),
    ))
}
