//! Linux backend
//!
//! `O_DIRECT` bypasses the page cache; the write direction adds `O_DSYNC` so
//! a completed write implies durability, matching the write-through contract.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use crate::{OpenMode, PlatformError, Result, VolumeGeometry};

pub(crate) fn configure(options: &mut OpenOptions, mode: OpenMode) {
    let mut flags = libc::O_DIRECT;
    if mode == OpenMode::WriteThrough {
        flags |= libc::O_DSYNC;
    }
    options.custom_flags(flags);
}

pub(crate) fn post_open(_file: &File, _mode: OpenMode) -> Result<()> {
    Ok(())
}

pub(crate) fn query_geometry(path: &Path) -> Result<VolumeGeometry> {
    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        PlatformError::VolumeQuery {
            path: path.display().to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path contains a NUL byte",
            ),
        }
    })?;

    // SAFETY: statvfs only writes into the zeroed struct; c_path is a valid
    // NUL-terminated string that outlives the call.
    #[allow(unsafe_code)]
    let stat = unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(c_path.as_ptr(), &mut stat) != 0 {
            return Err(PlatformError::VolumeQuery {
                path: path.display().to_string(),
                source: std::io::Error::last_os_error(),
            });
        }
        stat
    };

    Ok(VolumeGeometry {
        sector_size: stat.f_frsize as u64,
        free_bytes: stat.f_bavail as u64 * stat.f_frsize as u64,
    })
}
