use std::path::{Path, PathBuf};

use similar::TextDiff;
use tracing::{debug, info, warn};

use crate::cli::Options;
use crate::error::{ReformatError, Result};
use crate::scanner::collect_files;
use crate::utils::{file_digest, read_source};
use crate::writer::overwrite_encoded;

/// What a dry run would have written to one file.
#[derive(Debug, Clone)]
pub struct Preview {
    pub path: PathBuf,
    /// Unified diff between the current and the proposed content.
    pub diff: String,
}

#[derive(Default, Debug)]
pub struct Counters {
    pub scanned: usize,
    /// Files rewritten, or that would be rewritten under `dry_run`.
    pub rewritten: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Directory entries the walk could not visit.
    pub skipped: usize,
    pub failures: Vec<ReformatError>,
    pub previews: Vec<Preview>,
}

enum Outcome {
    Rewritten,
    Unchanged,
    Previewed(Preview),
}

/// Reformats every file selected by `opts` with `transform`, one file at a
/// time. Per-file errors are logged and counted, or returned at once when
/// `opts.fail_fast` is set. Only a missing root path fails the whole run
/// up front.
pub fn run_reformat<F>(transform: F, opts: &Options) -> Result<Counters>
where
    F: Fn(&Path, &str) -> Result<Vec<String>>,
{
    let scan = collect_files(&opts.path, &opts.scan_options())?;

    let mut counters = Counters {
        skipped: scan.errors.len(),
        ..Counters::default()
    };

    for file in &scan.files {
        counters.scanned += 1;
        match reformat_file(&transform, file, opts) {
            Ok(Outcome::Rewritten) => counters.rewritten += 1,
            Ok(Outcome::Unchanged) => counters.unchanged += 1,
            Ok(Outcome::Previewed(preview)) => {
                counters.rewritten += 1;
                counters.previews.push(preview);
            }
            Err(err) => {
                warn!(path = %file.display(), error = %err, "file not reformatted");
                if opts.fail_fast {
                    return Err(err);
                }
                counters.failed += 1;
                counters.failures.push(err);
            }
        }
    }

    Ok(counters)
}

fn reformat_file<F>(transform: &F, path: &Path, opts: &Options) -> Result<Outcome>
where
    F: Fn(&Path, &str) -> Result<Vec<String>>,
{
    let source = read_source(path)?;
    let lines = transform(path, &source.text)?;
    let new_text = lines.concat();

    if new_text == source.text {
        debug!(path = %path.display(), "nothing to rewrite");
        return Ok(Outcome::Unchanged);
    }

    if opts.dry_run {
        let shown = path.display().to_string();
        let diff = TextDiff::from_lines(source.text.as_str(), new_text.as_str())
            .unified_diff()
            .context_radius(2)
            .header(&shown, &shown)
            .to_string();
        return Ok(Outcome::Previewed(Preview {
            path: path.to_path_buf(),
            diff,
        }));
    }

    let current = file_digest(path).map_err(|source| ReformatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if current != source.digest {
        return Err(ReformatError::ConcurrentModification {
            path: path.to_path_buf(),
        });
    }

    overwrite_encoded(path, &lines, source.encoding, opts.strategy)?;
    info!(path = %path.display(), encoding = source.encoding.name(), "rewritten");
    Ok(Outcome::Rewritten)
}
