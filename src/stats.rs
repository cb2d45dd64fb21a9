use crate::error::Error;
use ahash::AHashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Counters for one target or read-only root.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirStats {
    pub directory: PathBuf,
    pub is_target_dir: bool,
    /// Duplicates attributed to this root. Always zero for read-only roots.
    pub dup_file_count: u64,
    pub dup_file_size: u64,
    pub total_file_count: u64,
    pub total_file_size: u64,
    pub total_dir_count: u64,
    pub empty_dir_count: u64,
}

impl DirStats {
    pub fn new(directory: PathBuf, is_target_dir: bool) -> Self {
        Self {
            directory,
            is_target_dir,
            ..Default::default()
        }
    }
}

/// Statistics for a whole run, keyed by root path exactly as it was given.
#[derive(Debug, Clone)]
pub struct RunStats {
    started: Instant,
    dir_stats: AHashMap<PathBuf, DirStats>,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            dir_stats: AHashMap::new(),
        }
    }

    /// Register a root. Registering an already known root keeps its counters.
    pub fn register(&mut self, root: &Path, is_target_dir: bool) -> &mut DirStats {
        self.dir_stats
            .entry(root.to_path_buf())
            .or_insert_with(|| DirStats::new(root.to_path_buf(), is_target_dir))
    }

    pub fn get(&self, root: &Path) -> Option<&DirStats> {
        self.dir_stats.get(root)
    }

    pub fn dir_mut(&mut self, root: &Path) -> Result<&mut DirStats, Error> {
        self.dir_stats
            .get_mut(root)
            .ok_or_else(|| Error::UnregisteredRoot(root.to_path_buf()))
    }

    /// Stats of the registered target root containing `file`, found by walking up its
    /// parent directories.
    pub fn owning_target_mut(&mut self, file: &Path) -> Result<&mut DirStats, Error> {
        let owner = file
            .ancestors()
            .skip(1)
            .find(|dir| {
                self.dir_stats
                    .get(*dir)
                    .is_some_and(|stats| stats.is_target_dir)
            })
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::UnownedEntry(file.to_path_buf()))?;
        self.dir_mut(&owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirStats> {
        self.dir_stats.values()
    }

    pub fn len(&self) -> usize {
        self.dir_stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dir_stats.is_empty()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn total_dup_files(&self) -> u64 {
        self.targets().map(|s| s.dup_file_count).sum()
    }

    pub fn total_dup_size(&self) -> u64 {
        self.targets().map(|s| s.dup_file_size).sum()
    }

    pub fn total_empty_dirs(&self) -> u64 {
        self.targets().map(|s| s.empty_dir_count).sum()
    }

    pub fn total_files(&self) -> u64 {
        self.iter().map(|s| s.total_file_count).sum()
    }

    pub fn total_dirs(&self) -> u64 {
        self.iter().map(|s| s.total_dir_count).sum()
    }

    fn targets(&self) -> impl Iterator<Item = &DirStats> {
        self.iter().filter(|s| s.is_target_dir)
    }
}
