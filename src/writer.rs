//! Crash-safe in-place file replacement.
//!
//! The new content is written to a sibling `<name>.writing` file, synced,
//! and then moved over the original. A reader of the original path sees
//! either the old or the new full content, with one exception: under
//! [`ReplaceStrategy::RemoveThenRename`] the path briefly does not exist
//! between the remove and the rename.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::error::{ReformatError, Result};
use crate::utils::encode_lines;

pub const TEMP_SUFFIX: &str = ".writing";

/// How the finished temporary file is moved over the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceStrategy {
    /// `rename(2)` over the existing file. Atomic on POSIX filesystems.
    AtomicRename,
    /// Remove the target first, then rename. For platforms where renaming
    /// onto an existing file fails. Not atomic.
    RemoveThenRename,
}

impl ReplaceStrategy {
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            ReplaceStrategy::RemoveThenRename
        } else {
            ReplaceStrategy::AtomicRename
        }
    }
}

impl Default for ReplaceStrategy {
    fn default() -> Self {
        Self::platform_default()
    }
}

pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Replaces `path` with `lines`, UTF-8 encoded.
pub fn overwrite(path: &Path, lines: &[String]) -> Result<()> {
    overwrite_encoded(path, lines, UTF_8, ReplaceStrategy::platform_default())
}

pub fn overwrite_encoded(
    path: &Path,
    lines: &[String],
    encoding: &'static Encoding,
    strategy: ReplaceStrategy,
) -> Result<()> {
    let bytes = encode_lines(lines, encoding);
    overwrite_with(path, strategy, |w| w.write_all(&bytes))
}

/// Runs `fill` against the temporary file and, only if it and the flush
/// succeed, moves the temporary file over `path`. On any failure the
/// temporary file is removed and `path` is left as it was.
///
/// A symlinked `path` is resolved first so the link stays a link and the
/// file it points to receives the new content.
pub fn overwrite_with<F>(path: &Path, strategy: ReplaceStrategy, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let tmp = temp_path_for(&target);

    let written = write_temp(&tmp, fill).and_then(|()| {
        copy_permissions(&target, &tmp);
        replace_file(&tmp, &target, strategy)
    });

    if let Err(source) = written {
        if let Err(e) = fs::remove_file(&tmp) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(tmp = %tmp.display(), error = %e, "could not remove temporary file");
            }
        }
        return Err(ReformatError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!(path = %target.display(), ?strategy, "file replaced");
    Ok(())
}

fn write_temp<F>(tmp: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let file = File::create(tmp)?;
    let mut writer = BufWriter::new(file);
    fill(&mut writer)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

/// Moves `tmp` over `target` using `strategy`.
pub fn replace_file(tmp: &Path, target: &Path, strategy: ReplaceStrategy) -> io::Result<()> {
    match strategy {
        ReplaceStrategy::AtomicRename => fs::rename(tmp, target),
        ReplaceStrategy::RemoveThenRename => {
            if target.is_file() {
                fs::remove_file(target)?;
            }
            fs::rename(tmp, target)
        }
    }
}

#[cfg(unix)]
fn copy_permissions(from: &Path, to: &Path) {
    if let Ok(meta) = fs::metadata(from) {
        if let Err(e) = fs::set_permissions(to, meta.permissions()) {
            warn!(tmp = %to.display(), error = %e, "could not copy permissions");
        }
    }
}

#[cfg(not(unix))]
fn copy_permissions(_from: &Path, _to: &Path) {}
