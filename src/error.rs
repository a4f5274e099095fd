use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReformatError {
    #[error("path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: tag has no following token", path.display())]
    MalformedTagLine { path: PathBuf, line: usize },

    #[error("cannot write {} (original left untouched): {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot visit {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{} changed on disk since it was read; not overwritten", path.display())]
    ConcurrentModification { path: PathBuf },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T, E = ReformatError> = std::result::Result<T, E>;
