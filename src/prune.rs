use crate::error::Error;
use crate::gate::{ConfirmationGate, RemovalKind, Verdict};
use crate::platform;
use crate::stats::RunStats;
use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Removes directories under the target roots that hold no files, bottom-up.
///
/// First pass: depth-first from each root, removing directories that are empty when
/// visited and stacking directories that contain only subdirectories. Second pass: pop
/// the stack (deepest first) and retry those that have since become empty.
pub struct EmptyDirPruner<'g, 'io> {
    gate: &'g mut ConfirmationGate<'io>,
}

/// A directory containing only subdirectories, and the root that owns it.
struct Pending {
    dir: PathBuf,
    root: PathBuf,
}

impl<'g, 'io> EmptyDirPruner<'g, 'io> {
    pub fn new(gate: &'g mut ConfirmationGate<'io>) -> Self {
        Self { gate }
    }

    /// Prune below each of `targets`. Counts go to each root's `empty_dir_count`, so
    /// the roots must be registered in `stats`.
    pub fn prune(
        &mut self,
        targets: &[PathBuf],
        stats: &mut RunStats,
    ) -> Result<ControlFlow<()>, Error> {
        let mut pending = Vec::new();
        for root in targets {
            if self.visit(root, root, stats, &mut pending)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        while let Some(Pending { dir, root }) = pending.pop() {
            if !is_empty_dir(&dir)? {
                trace!("{} is not empty, keeping it", dir.display());
                continue;
            }
            match self.gate.resolve(&dir, RemovalKind::EmptyDir) {
                Ok(Verdict::Removed) => stats.dir_mut(&root)?.empty_dir_count += 1,
                Ok(Verdict::Abort) => return Ok(ControlFlow::Break(())),
                Ok(_) => {}
                Err(Error::Remove { path, source })
                    if source.kind() == io::ErrorKind::DirectoryNotEmpty =>
                {
                    debug!("{} filled up again, keeping it", path.display());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn visit(
        &mut self,
        dir: &Path,
        root: &Path,
        stats: &mut RunStats,
        pending: &mut Vec<Pending>,
    ) -> Result<ControlFlow<()>, Error> {
        let entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;

        if entries.is_empty() {
            return Ok(match self.gate.resolve(dir, RemovalKind::EmptyDir)? {
                Verdict::Removed => {
                    stats.dir_mut(root)?.empty_dir_count += 1;
                    ControlFlow::Continue(())
                }
                Verdict::Abort => ControlFlow::Break(()),
                Verdict::Kept | Verdict::SkipDir(_) => ControlFlow::Continue(()),
            });
        }

        let mut subdirs = Vec::new();
        let mut holds_files = false;
        for entry in entries {
            let metadata = entry.metadata()?;
            if metadata.is_dir() && !platform::is_link(&metadata) {
                subdirs.push(entry.path());
            } else {
                holds_files = true;
            }
        }
        if !holds_files {
            pending.push(Pending {
                dir: dir.to_path_buf(),
                root: root.to_path_buf(),
            });
        }

        subdirs.sort();
        for subdir in subdirs {
            if self.visit(&subdir, root, stats, pending)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}
