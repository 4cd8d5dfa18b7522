//! Windows backend
//!
//! `FILE_FLAG_NO_BUFFERING` bypasses the page cache and
//! `FILE_FLAG_WRITE_THROUGH` makes writes durable on completion; geometry
//! comes from `GetDiskFreeSpaceW` / `GetDiskFreeSpaceExW`.

use std::fs::{File, OpenOptions};
use std::os::windows::ffi::OsStrExt;
use std::os::windows::fs::OpenOptionsExt;
use std::path::Path;

use windows_sys::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDiskFreeSpaceW, FILE_FLAG_NO_BUFFERING, FILE_FLAG_WRITE_THROUGH,
};

use crate::{OpenMode, PlatformError, Result, VolumeGeometry};

pub(crate) fn configure(options: &mut OpenOptions, mode: OpenMode) {
    let flags = match mode {
        OpenMode::WriteThrough => FILE_FLAG_NO_BUFFERING | FILE_FLAG_WRITE_THROUGH,
        OpenMode::Read => FILE_FLAG_NO_BUFFERING,
    };
    options.custom_flags(flags);
}

pub(crate) fn post_open(_file: &File, _mode: OpenMode) -> Result<()> {
    Ok(())
}

pub(crate) fn query_geometry(path: &Path) -> Result<VolumeGeometry> {
    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    let mut sectors_per_cluster = 0u32;
    let mut bytes_per_sector = 0u32;
    let mut free_clusters = 0u32;
    let mut total_clusters = 0u32;
    // SAFETY: all out-pointers reference live locals; wide is NUL-terminated.
    #[allow(unsafe_code)]
    let ok = unsafe {
        GetDiskFreeSpaceW(
            wide.as_ptr(),
            &mut sectors_per_cluster,
            &mut bytes_per_sector,
            &mut free_clusters,
            &mut total_clusters,
        )
    };
    if ok == 0 {
        return Err(PlatformError::VolumeQuery {
            path: path.display().to_string(),
            source: std::io::Error::last_os_error(),
        });
    }

    let mut free_available = 0u64;
    let mut total_bytes = 0u64;
    let mut total_free = 0u64;
    // SAFETY: all out-pointers reference live locals; wide is NUL-terminated.
    #[allow(unsafe_code)]
    let ok = unsafe {
        GetDiskFreeSpaceExW(
            wide.as_ptr(),
            &mut free_available,
            &mut total_bytes,
            &mut total_free,
        )
    };
    if ok == 0 {
        return Err(PlatformError::VolumeQuery {
            path: path.display().to_string(),
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(VolumeGeometry {
        sector_size: bytes_per_sector as u64,
        free_bytes: free_available,
    })
}
