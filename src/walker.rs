use crate::catalog::{self, CatalogEntry, FileCatalog};
use crate::error::Error;
use crate::gate::{ConfirmationGate, RemovalKind, Verdict};
use crate::platform;
use crate::progress::{ProgressReporter, WalkMode};
use crate::relation;
use crate::stats::RunStats;
use std::cmp::Ordering;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
enum WalkState {
    Descending,
    /// Nothing at or below this directory is evaluated.
    Skipping(PathBuf),
}

/// Outcome of evaluating one file.
enum FileFlow {
    Next,
    SkipDir(PathBuf),
    Abort,
}

/// Single-pass, depth-first traversal of a set of roots that feeds every file through
/// the catalog and deletes duplicates via the gate.
///
/// Within a directory all files are evaluated before any subdirectory is entered.
/// Symbolic links and reparse points are never followed or evaluated.
pub struct TreeWalker<'w, 'io> {
    catalog: &'w mut FileCatalog,
    stats: &'w mut RunStats,
    gate: &'w mut ConfirmationGate<'io>,
    reporter: &'w dyn ProgressReporter,
}

impl<'w, 'io> TreeWalker<'w, 'io> {
    pub fn new(
        catalog: &'w mut FileCatalog,
        stats: &'w mut RunStats,
        gate: &'w mut ConfirmationGate<'io>,
        reporter: &'w dyn ProgressReporter,
    ) -> Self {
        Self {
            catalog,
            stats,
            gate,
            reporter,
        }
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    /// Walk `roots` in order. Every root must already be registered in the stats.
    /// Breaks when the user quits.
    pub fn walk(&mut self, roots: &[PathBuf], mode: WalkMode) -> Result<ControlFlow<()>, Error> {
        for root in roots {
            let start = Instant::now();
            let flow = self.walk_root(root, mode)?;
            let files = self.stats.dir_mut(root)?.total_file_count;
            self.reporter
                .on_walk_complete(mode, files, start.elapsed());
            if flow.is_break() {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn walk_root(&mut self, root: &Path, mode: WalkMode) -> Result<ControlFlow<()>, Error> {
        debug!("Scanning {} directory {}", mode.label(), root.display());
        let mut state = WalkState::Descending;
        let mut entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if entry.depth() > 0 && platform::is_link(&entry.metadata()?) {
                    trace!("Not following link {}", entry.path().display());
                    entries.skip_current_dir();
                    continue;
                }
                if still_skipping(&mut state, entry.path())? {
                    entries.skip_current_dir();
                    continue;
                }
                self.stats.dir_mut(root)?.total_dir_count += 1;
                self.reporter.on_scan_dir(mode, entry.path());
            } else if file_type.is_file() {
                let dir = entry.path().parent().unwrap_or(root);
                if still_skipping(&mut state, dir)? {
                    continue;
                }
                match self.evaluate_file(root, &entry, mode)? {
                    FileFlow::Next => {}
                    FileFlow::SkipDir(dir) => {
                        debug!("Skipping the rest of {}", dir.display());
                        state = WalkState::Skipping(dir);
                    }
                    FileFlow::Abort => return Ok(ControlFlow::Break(())),
                }
            } else if file_type.is_symlink() {
                trace!("Not following link {}", entry.path().display());
            } else {
                trace!("Ignoring special file {}", entry.path().display());
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn evaluate_file(
        &mut self,
        root: &Path,
        entry: &DirEntry,
        mode: WalkMode,
    ) -> Result<FileFlow, Error> {
        let path = entry.path();
        let size = entry.metadata()?.len();
        let extension = catalog::path_extension(path);

        let root_stats = self.stats.dir_mut(root)?;
        root_stats.total_file_count += 1;
        root_stats.total_file_size += size;

        let found = catalog::find_match(path, size, &extension, self.catalog)?.cloned();

        match (mode, found) {
            (WalkMode::Target, Some(original)) => {
                let root_stats = self.stats.dir_mut(root)?;
                root_stats.dup_file_count += 1;
                root_stats.dup_file_size += size;
                self.reporter.on_duplicate(mode, path, original.path());
                debug!("{} duplicates {}", path.display(), original.path().display());

                Ok(match self.gate.resolve(path, RemovalKind::File)? {
                    Verdict::Removed | Verdict::Kept => FileFlow::Next,
                    Verdict::SkipDir(dir) => FileFlow::SkipDir(dir),
                    Verdict::Abort => FileFlow::Abort,
                })
            }
            (WalkMode::Target, None) => {
                self.catalog
                    .insert(CatalogEntry::new(path.to_path_buf(), extension, size));
                Ok(FileFlow::Next)
            }
            (WalkMode::ReadOnly, Some(duplicate)) => {
                let owner = self.stats.owning_target_mut(duplicate.path())?;
                owner.dup_file_count += 1;
                owner.dup_file_size += size;
                self.reporter.on_duplicate(mode, duplicate.path(), path);
                debug!("{} duplicates {}", duplicate.path().display(), path.display());

                // Read-only files are never deleted; the target copy goes instead.
                let verdict = self.gate.resolve(duplicate.path(), RemovalKind::File)?;
                self.catalog.remove(&duplicate);

                Ok(match verdict {
                    Verdict::Removed | Verdict::Kept => FileFlow::Next,
                    Verdict::SkipDir(_) => {
                        FileFlow::SkipDir(path.parent().unwrap_or(root).to_path_buf())
                    }
                    Verdict::Abort => FileFlow::Abort,
                })
            }
            (WalkMode::ReadOnly, None) => Ok(FileFlow::Next),
        }
    }
}

/// Leave `Skipping` once the walk reaches a directory outside the skipped subtree.
/// Returns true while `dir` is still inside it.
fn still_skipping(state: &mut WalkState, dir: &Path) -> Result<bool, Error> {
    if let WalkState::Skipping(skip_dir) = state {
        if relation::is_same_or_descendant(dir, skip_dir)? {
            return Ok(true);
        }
        *state = WalkState::Descending;
    }
    Ok(false)
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
