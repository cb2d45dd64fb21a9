use crate::error::Error;
use crate::platform;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// True when `candidate` is `ancestor` or lies somewhere below it.
///
/// Both paths are canonicalized, then every directory from `candidate` up to the
/// filesystem root is compared with `ancestor` by filesystem identity, so aliases
/// (symlinks, UNC paths vs mapped drives) are recognized.
pub fn is_same_or_descendant(candidate: &Path, ancestor: &Path) -> Result<bool, Error> {
    let candidate = canonicalize(candidate)?;
    let ancestor_id = platform::file_id(&canonicalize(ancestor)?)?;

    for dir in candidate.ancestors() {
        if dir.as_os_str().is_empty() {
            break;
        }
        if platform::file_id(dir)? == ancestor_id {
            return Ok(true);
        }
    }
    Ok(false)
}

fn canonicalize(path: &Path) -> Result<PathBuf, Error> {
    fs::canonicalize(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })
}

/// Reject root sets that would scan a subtree twice or let the target walk see
/// read-only files.
///
/// Every root must be an existing, real directory. Targets may not equal or nest in
/// each other, in a read-only root, or contain a read-only root. Overlapping read-only
/// roots are allowed; they only cost time.
pub fn validate_roots(targets: &[PathBuf], read_only: &[PathBuf]) -> Result<(), Error> {
    if targets.is_empty() {
        return Err(Error::NoTargets);
    }

    for dir in targets.iter().chain(read_only) {
        check_directory(dir)?;
    }

    for (i, child) in targets.iter().enumerate() {
        for (j, parent) in targets.iter().enumerate() {
            if i != j && is_same_or_descendant(child, parent)? {
                return Err(Error::OverlappingTargets {
                    child: child.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    for target in targets {
        for ro in read_only {
            if is_same_or_descendant(target, ro)? {
                return Err(Error::TargetWithinReadOnly {
                    target: target.clone(),
                    read_only: ro.clone(),
                });
            }
            if is_same_or_descendant(ro, target)? {
                return Err(Error::ReadOnlyWithinTarget {
                    read_only: ro.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    debug!(
        "Validated {} target and {} read-only directories",
        targets.len(),
        read_only.len()
    );
    Ok(())
}

fn check_directory(dir: &Path) -> Result<(), Error> {
    if !dir.exists() {
        return Err(Error::MissingDirectory(dir.to_path_buf()));
    }
    let metadata = fs::symlink_metadata(dir)?;
    if platform::is_link(&metadata) {
        return Err(Error::SymlinkRoot(dir.to_path_buf()));
    }
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}
