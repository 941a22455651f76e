// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// The configuration store and the job supervisor only ever stat, read and
/// query free space, so that is all this trait covers.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Modification time of the entry itself (symlinks are not followed).
    fn modified(&self, path: &Path) -> Result<SystemTime>;

    /// Bytes available to unprivileged users on the filesystem holding `path`.
    fn available_space(&self, path: &Path) -> Result<u64>;
}

/// Implementation that uses `std::fs` and `statvfs(3)`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let meta =
            fs::symlink_metadata(path).with_context(|| format!("stat of {:?}", path))?;
        meta.modified()
            .with_context(|| format!("reading modification time of {:?}", path))
    }

    fn available_space(&self, path: &Path) -> Result<u64> {
        statvfs_available(path).with_context(|| format!("statvfs of {:?}", path))
    }
}

#[cfg(unix)]
fn statvfs_available(path: &Path) -> Result<u64> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())?;
    let mut st: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut st) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    let avail = (st.f_bavail as u128).saturating_mul(st.f_frsize as u128);
    Ok(avail.min(u64::MAX as u128) as u64)
}

#[cfg(not(unix))]
fn statvfs_available(_path: &Path) -> Result<u64> {
    anyhow::bail!("free space queries are only supported on unix")
}
