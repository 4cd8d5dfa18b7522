//! macOS backend
//!
//! macOS has no `O_DIRECT`; `F_NOCACHE` after open disables caching on the
//! file descriptor, the closest cache-bypass the platform offers.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use crate::{OpenMode, PlatformError, Result, VolumeGeometry};

pub(crate) fn configure(_options: &mut OpenOptions, _mode: OpenMode) {}

pub(crate) fn post_open(file: &File, _mode: OpenMode) -> Result<()> {
    // SAFETY: as_raw_fd returns a descriptor valid for the lifetime of `file`;
    // F_NOCACHE takes a plain int argument.
    #[allow(unsafe_code)]
    let rc = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) };
    if rc == -1 {
        return Err(PlatformError::Io(std::io::Error::last_os_error()));
    }
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
