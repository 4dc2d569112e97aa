use crate::age::Age;
use std::path::Path;
use std::time::SystemTime;

pub trait FileSystem {
    /// stat() an on-disk path, producing its Age.  A missing file is
    /// Age::Unknown rather than an error.
    fn stat(&self, path: &Path) -> std::io::Result<Age>;
    /// Rewrite a file's modification time, leaving its access time and
    /// content alone.
    fn set_mtime(&self, path: &Path, mtime: SystemTime) -> std::io::Result<()>;
    /// The current time, on the same clock as the stamps stat() returns.
    fn now(&self) -> SystemTime;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct RealFileSystem {}
impl RealFileSystem {
    pub fn new() -> Self {
        RealFileSystem {}
    }
}

impl FileSystem for RealFileSystem {
    fn stat(&self, path: &Path) -> std::io::Result<Age> {
        Ok(match std::fs::metadata(path) {
            Ok(meta) => Age::Stamp(meta.modified()?),
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    Age::Unknown
                } else {
                    return Err(err);
                }
            }
        })
    }

    fn set_mtime(&self, path: &Path, mtime: SystemTime) -> std::io::Result<()> {
        filetime::set_file_mtime(path, filetime::FileTime::from_system_time(mtime))
    }

    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
