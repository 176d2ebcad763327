// photometa/src/processors/filesystem.rs
use crate::core::{FileStat, MetaError, Result, Stat};
use std::fs::Metadata;
use std::path::Path;

/// `stat(2)` through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStat;

impl Stat for FsStat {
    fn stat(&self, path: &Path) -> Result<FileStat> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| MetaError::Filesystem(format!("{}: {}", path.display(), e)))?;
        Ok(file_stat(&metadata))
    }
}

#[cfg(unix)]
fn file_stat(metadata: &Metadata) -> FileStat {
    use std::os::unix::fs::MetadataExt;

    let seconds = |secs: i64, nanos: i64| secs as f64 + nanos as f64 / 1e9;

    FileStat {
        created: seconds(metadata.ctime(), metadata.ctime_nsec()),
        modified: seconds(metadata.mtime(), metadata.mtime_nsec()),
        accessed: seconds(metadata.atime(), metadata.atime_nsec()),
        mode: metadata.mode(),
        inode: metadata.ino(),
    }
}

#[cfg(not(unix))]
fn file_stat(metadata: &Metadata) -> FileStat {
    use std::time::{SystemTime, UNIX_EPOCH};

    let seconds = |time: std::io::Result<SystemTime>| {
        time.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    };

    let mode = if metadata.permissions().readonly() { 0o100444 } else { 0o100666 };

    FileStat {
        created: seconds(metadata.created()),
        modified: seconds(metadata.modified()),
        accessed: seconds(metadata.accessed()),
        mode,
        inode: 0,
    }
}
