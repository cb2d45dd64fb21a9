//! Filesystem identity and link detection.
//!
//! Two paths name the same directory when their [`FileId`]s are equal, regardless of
//! how the paths are spelled (symlinks, mapped drives vs UNC shares, `..` segments).

#[cfg(target_os = "windows")]
pub mod windows;

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Identity of an on-disk object: (device or volume, inode or file index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    volume: u64,
    index: u64,
}

impl FileId {
    pub(crate) fn new(volume: u64, index: u64) -> Self {
        Self { volume, index }
    }
}

/// Identity of the object `path` resolves to. Symlinks are followed.
#[cfg(unix)]
pub fn file_id(path: &Path) -> io::Result<FileId> {
    use std::os::unix::fs::MetadataExt;

    let metadata = std::fs::metadata(path)?;
    Ok(FileId::new(metadata.dev(), metadata.ino()))
}

#[cfg(target_os = "windows")]
pub fn file_id(path: &Path) -> io::Result<FileId> {
    windows::file_id(path)
}

#[cfg(not(any(unix, target_os = "windows")))]
pub fn file_id(path: &Path) -> io::Result<FileId> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("no file identity support for {}", path.display()),
    ))
}

/// True for symbolic links and, on Windows, any reparse point (directory junctions,
/// mount points). `metadata` must come from `symlink_metadata` or a `DirEntry`.
pub fn is_link(metadata: &Metadata) -> bool {
    metadata.file_type().is_symlink() || is_reparse_point(metadata)
}

#[cfg(target_os = "windows")]
fn is_reparse_point(metadata: &Metadata) -> bool {
    windows::is_reparse_point(metadata)
}

#[cfg(not(target_os = "windows"))]
fn is_reparse_point(_metadata: &Metadata) -> bool {
    false
}
