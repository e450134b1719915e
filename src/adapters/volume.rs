//! Free-space query through `statvfs(3)`.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use log::debug;

use crate::app::ports::VolumePort;
use crate::error::StorageFault;

#[derive(Debug, Default, Clone, Copy)]
pub struct StatvfsVolume;

impl VolumePort for StatvfsVolume {
    /// Space available to unprivileged users, in KiB.
    fn free_kb(&self, path: &Path) -> Result<u64, StorageFault> {
        let c_path =
            CString::new(path.as_os_str().as_bytes()).map_err(|_| StorageFault::QueryFailure)?;
        let mut stat: libc::statvfs = unsafe { core::mem::zeroed() };
        // SAFETY: `c_path` is NUL-terminated and `stat` is a valid out-pointer.
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
        if rc != 0 {
            debug!(
                "statvfs({}) failed: {}",
                path.display(),
                std::io::Error::last_os_error()
            );
            return Err(StorageFault::QueryFailure);
        }
        #[allow(clippy::unnecessary_cast)]
        let bytes = stat.f_bavail as u64 * stat.f_frsize as u64;
        Ok(bytes / 1024)
    }
}
