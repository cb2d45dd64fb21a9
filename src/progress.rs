use std::path::Path;
use std::time::Duration;

/// Which kind of root set a walk is traversing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    Target,
    ReadOnly,
}

impl WalkMode {
    pub fn label(self) -> &'static str {
        match self {
            WalkMode::Target => "target",
            WalkMode::ReadOnly => "read-only",
        }
    }
}

/// Trait for reporting run progress.
///
/// The CLI implements it to print verbose lines; all methods default to no-ops.
pub trait ProgressReporter {
    /// A directory is about to have its files evaluated.
    fn on_scan_dir(&self, _mode: WalkMode, _dir: &Path) {}
    /// `duplicate` is about to be offered for deletion because it matches `original`.
    /// In a read-only walk `duplicate` is the target file and `original` the
    /// read-only one.
    fn on_duplicate(&self, _mode: WalkMode, _duplicate: &Path, _original: &Path) {}
    fn on_walk_complete(&self, _mode: WalkMode, _files: u64, _duration: Duration) {}
    fn on_prune_complete(&self, _removed: u64, _duration: Duration) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
