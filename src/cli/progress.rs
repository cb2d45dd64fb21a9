use dedup::abbrev::abbrev_path;
use dedup::{ProgressReporter, WalkMode};
use indicatif::HumanCount;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Prints verbose progress lines on stdout, between the confirmation prompts.
pub struct CliReporter {
    verbose: bool,
    path_width: usize,
}

impl CliReporter {
    /// Paths are abbreviated to 80% of `term_width`.
    pub fn new(verbose: bool, term_width: usize) -> Self {
        Self {
            verbose,
            path_width: term_width * 4 / 5,
        }
    }

    fn abbrev(&self, path: &Path) -> String {
        abbrev_path(path, self.path_width)
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_dir(&self, mode: WalkMode, dir: &Path) {
        if self.verbose {
            println!("Scanning {} directory {}", mode.label(), self.abbrev(dir));
        }
    }

    fn on_duplicate(&self, mode: WalkMode, duplicate: &Path, original: &Path) {
        if !self.verbose {
            return;
        }
        match mode {
            WalkMode::Target => {
                let name = duplicate.file_name().unwrap_or(duplicate.as_os_str());
                println!(
                    "  {} duplicates {}",
                    name.to_string_lossy(),
                    self.abbrev(original)
                );
            }
            WalkMode::ReadOnly => {
                println!(
                    "  {} duplicates {}",
                    self.abbrev(duplicate),
                    original.display()
                );
            }
        }
    }

    fn on_walk_complete(&self, mode: WalkMode, files: u64, duration: Duration) {
        info!(
            "Scanned {} files in {} directory in {:.2}s",
            HumanCount(files),
            mode.label(),
            duration.as_secs_f64()
        );
    }

    fn on_prune_complete(&self, removed: u64, duration: Duration) {
        info!(
            "Removed {} empty directories in {:.2}s",
            HumanCount(removed),
            duration.as_secs_f64()
        );
    }
}
