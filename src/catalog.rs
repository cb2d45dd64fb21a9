use ahash::AHashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::trace;

const COMPARE_BUFFER_SIZE: usize = 64 * 1024; // 64KB

/// A target-tree file believed unique among everything scanned so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    path: PathBuf,
    extension: String,
    size: u64,
}

impl CatalogEntry {
    pub fn new(path: PathBuf, extension: String, size: u64) -> Self {
        Self {
            path,
            extension,
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Index of kept target files bucketed by size, then extension. Each bucket keeps
/// insertion order.
#[derive(Debug, Default)]
pub struct FileCatalog {
    buckets: AHashMap<u64, AHashMap<String, Vec<CatalogEntry>>>,
    len: usize,
}

impl FileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries with exactly this size and extension, oldest first.
    pub fn candidates(&self, size: u64, extension: &str) -> &[CatalogEntry] {
        self.buckets
            .get(&size)
            .and_then(|by_extension| by_extension.get(extension))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The caller guarantees no entry with the same path is present.
    pub fn insert(&mut self, entry: CatalogEntry) {
        debug_assert!(
            !self.contains(entry.path(), entry.size(), entry.extension()),
            "{} catalogued twice",
            entry.path().display()
        );
        self.buckets
            .entry(entry.size)
            .or_default()
            .entry(entry.extension.clone())
            .or_default()
            .push(entry);
        self.len += 1;
    }

    /// Remove `entry`, keeping the order of the rest of its bucket. Returns false when
    /// it was not catalogued.
    pub fn remove(&mut self, entry: &CatalogEntry) -> bool {
        let Some(by_extension) = self.buckets.get_mut(&entry.size) else {
            return false;
        };
        let Some(bucket) = by_extension.get_mut(&entry.extension) else {
            return false;
        };
        let Some(position) = bucket.iter().position(|e| e.path == entry.path) else {
            return false;
        };

        bucket.remove(position);
        if bucket.is_empty() {
            by_extension.remove(&entry.extension);
            if by_extension.is_empty() {
                self.buckets.remove(&entry.size);
            }
        }
        self.len -= 1;
        true
    }

    fn contains(&self, path: &Path, size: u64, extension: &str) -> bool {
        self.candidates(size, extension)
            .iter()
            .any(|e| e.path == path)
    }
}

/// Extension used for bucketing: everything from the rightmost `.` of the file name,
/// ignoring leading dots, or the whole name when it is a dot-file with no other dot.
///
/// `foo.bar` → `.bar`, `.profile` → `.profile`, `bingles` → ``.
pub fn extension_of(file_name: &str) -> String {
    let stem = file_name.trim_start_matches('.');
    let leading_dots = file_name.len() - stem.len();
    match stem.rfind('.') {
        Some(dot) => file_name[leading_dots + dot..].to_string(),
        None if leading_dots > 0 => file_name.to_string(),
        None => String::new(),
    }
}

/// Extension of the final component of `path`.
pub fn path_extension(path: &Path) -> String {
    path.file_name()
        .map(|name| extension_of(&name.to_string_lossy()))
        .unwrap_or_default()
}

/// Find the first catalogued file, in insertion order, whose bytes equal `path`.
///
/// Only the (size, extension) bucket is searched and the scan stops at the first
/// match.
pub fn find_match<'c>(
    path: &Path,
    size: u64,
    extension: &str,
    catalog: &'c FileCatalog,
) -> io::Result<Option<&'c CatalogEntry>> {
    for candidate in catalog.candidates(size, extension) {
        if files_identical(path, candidate.path())? {
            trace!(
                "{} matches {}",
                path.display(),
                candidate.path().display()
            );
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Full byte-for-byte comparison of two files.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let file_a = File::open(a)?;
    let file_b = File::open(b)?;
    if file_a.metadata()?.len() != file_b.metadata()?.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::with_capacity(COMPARE_BUFFER_SIZE, file_a);
    let mut reader_b = BufReader::with_capacity(COMPARE_BUFFER_SIZE, file_b);
    loop {
        let chunk_a = reader_a.fill_buf()?;
        let chunk_b = reader_b.fill_buf()?;
        if chunk_a.is_empty() || chunk_b.is_empty() {
            return Ok(chunk_a.is_empty() && chunk_b.is_empty());
        }
        let n = chunk_a.len().min(chunk_b.len());
        if chunk_a[..n] != chunk_b[..n] {
            return Ok(false);
        }
        reader_a.consume(n);
        reader_b.consume(n);
    }
}
