use crate::catalog::FileCatalog;
use crate::config::AppConfig;
use crate::error::Error;
use crate::gate::ConfirmationGate;
use crate::progress::{ProgressReporter, WalkMode};
use crate::prune::EmptyDirPruner;
use crate::relation;
use crate::stats::RunStats;
use crate::walker::TreeWalker;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct DedupEngine {
    targets: Vec<PathBuf>,
    read_only: Vec<PathBuf>,
    remove_empty_dirs: bool,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunStats),
    /// The user quit at a prompt. Statistics gathered so far are discarded.
    Aborted,
}

impl DedupEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            targets: config.target_paths(),
            read_only: dedup_paths(config.read_only_paths()),
            remove_empty_dirs: config.remove_empty_dirs,
        }
    }

    /// Pre-flight checks. Nothing on disk is modified.
    pub fn validate(&self) -> Result<(), Error> {
        relation::validate_roots(&self.targets, &self.read_only)
    }

    /// Run the full pipeline:
    /// 1. Validate roots
    /// 2. Walk target roots, deleting duplicates among them
    /// 3. Walk read-only roots, deleting target copies of read-only files
    /// 4. Optionally remove directories left empty under the target roots
    pub fn run(
        &self,
        gate: &mut ConfirmationGate<'_>,
        reporter: &dyn ProgressReporter,
    ) -> Result<RunOutcome, Error> {
        self.validate()?;

        // Every root is known before any match needs to be attributed to one.
        let mut stats = RunStats::new();
        for root in &self.targets {
            stats.register(root, true);
        }
        for root in &self.read_only {
            stats.register(root, false);
        }
        let mut catalog = FileCatalog::new();

        let phase_start = Instant::now();
        {
            let mut walker = TreeWalker::new(&mut catalog, &mut stats, gate, reporter);

            info!("Scanning target directories...");
            if walker.walk(&self.targets, WalkMode::Target)?.is_break() {
                info!("Quit requested during target scan");
                return Ok(RunOutcome::Aborted);
            }
            debug!(
                "Target scan completed in {:.2}s, {} unique files catalogued",
                phase_start.elapsed().as_secs_f64(),
                walker.catalog_len(),
            );

            if !self.read_only.is_empty() {
                info!("Scanning read-only directories...");
                if walker.walk(&self.read_only, WalkMode::ReadOnly)?.is_break() {
                    info!("Quit requested during read-only scan");
                    return Ok(RunOutcome::Aborted);
                }
            }
        }

        if self.remove_empty_dirs {
            info!("Removing empty directories...");
            let prune_start = Instant::now();
            let flow = EmptyDirPruner::new(gate).prune(&self.targets, &mut stats)?;
            if flow.is_break() {
                info!("Quit requested while removing empty directories");
                return Ok(RunOutcome::Aborted);
            }
            reporter.on_prune_complete(stats.total_empty_dirs(), prune_start.elapsed());
        }

        info!(
            "{} duplicate files ({} bytes) found, {} files scanned in {:.2}s",
            stats.total_dup_files(),
            stats.total_dup_size(),
            stats.total_files(),
            stats.elapsed().as_secs_f64(),
        );
        Ok(RunOutcome::Completed(stats))
    }
}

/// Drop exact repeats, keeping first occurrences in order.
fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if result.contains(&path) {
            warn!("Read-only directory {} given more than once", path.display());
            continue;
        }
        result.push(path);
    }
    result
}
