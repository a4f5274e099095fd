use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ReformatError, Result};

/// The maximum depth to reach while recursively exploring sub folders.
pub const MAX_DEPTH_RECUR: usize = 100;

/// Path token accepted as-is without touching the filesystem.
pub const STDIN_SENTINEL: &str = "-";

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    /// Depth of `path` itself; subdirectories are entered while this is
    /// below `max_depth`.
    pub depth: usize,
    pub max_depth: usize,
    pub extension: String,
    pub ignore_patterns: Vec<Pattern>,
}

impl ScanOptions {
    pub fn new(extension: impl Into<String>) -> Self {
        ScanOptions {
            recursive: true,
            depth: 0,
            max_depth: MAX_DEPTH_RECUR,
            extension: extension.into(),
            ignore_patterns: Vec::new(),
        }
    }

    /// How many directory levels below the root walkdir may yield entries from.
    fn walk_depth(&self) -> usize {
        if !self.recursive {
            return 1;
        }
        let ceiling = self.max_depth.min(MAX_DEPTH_RECUR);
        ceiling.saturating_sub(self.depth) + 1
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<PathBuf>,
    /// Entries that could not be visited. The walk carries on past them.
    pub errors: Vec<ReformatError>,
}

fn is_ignored(rel: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let name = rel.file_name().and_then(|s| s.to_str()).unwrap_or("");
    let s_rel = rel.to_string_lossy().replace('\\', "/");
    patterns
        .iter()
        .any(|pat| pat.matches(&s_rel) || pat.matches(name))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(extension))
        .unwrap_or(false)
}

/// Collects the files under `path` whose name ends with the configured
/// extension, depth-first, in file-name order within each directory.
///
/// A regular file (or the `-` sentinel) is returned as the sole entry
/// whatever its extension.
pub fn collect_files(path: &Path, opts: &ScanOptions) -> Result<ScanResult> {
    if path.as_os_str() == STDIN_SENTINEL || path.is_file() {
        return Ok(ScanResult {
            files: vec![path.to_path_buf()],
            errors: Vec::new(),
        });
    }
    if !path.exists() {
        return Err(ReformatError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut result = ScanResult::default();
    let walker = WalkDir::new(path)
        .min_depth(1)
        .max_depth(opts.walk_depth())
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| match e.path().strip_prefix(path) {
        Ok(rel) => !is_ignored(rel, &opts.ignore_patterns),
        Err(_) => true,
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let at = source.path().unwrap_or(path).to_path_buf();
                warn!(path = %at.display(), error = %source, "skipping unreadable entry");
                result.errors.push(ReformatError::Traversal { path: at, source });
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), &opts.extension) {
            result.files.push(entry.into_path());
        }
    }

    debug!(
        root = %path.display(),
        files = result.files.len(),
        errors = result.errors.len(),
        "scan finished"
    );
    Ok(result)
}
