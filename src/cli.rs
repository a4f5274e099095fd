use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glob::Pattern;

use crate::error::ReformatError;
use crate::scanner::{ScanOptions, MAX_DEPTH_RECUR};
use crate::writer::ReplaceStrategy;

pub const DEFAULT_EXTENSION: &str = ".py";

#[derive(Parser, Debug)]
#[command(author, version, about = "Rewrite Doxygen docstring tags as epytext, in place", long_about = None)]
pub struct Args {
    /// File or directory to reformat
    pub path: PathBuf,

    /// Only files whose name ends with this are rewritten
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Do not descend into subdirectories
    #[arg(long)]
    pub no_recursive: bool,

    /// How many directory levels to descend (capped at 100)
    #[arg(short = 'd', long, default_value_t = MAX_DEPTH_RECUR)]
    pub max_depth: usize,

    /// Glob patterns to ignore (can be repeated or comma separated)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub ignore: Vec<String>,

    /// Do not write anything; print the diff of what would change
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first file that cannot be reformatted
    #[arg(long)]
    pub fail_fast: bool,
}

/// Everything a reformatting run needs.
#[derive(Debug, Clone)]
pub struct Options {
    pub path: PathBuf,
    pub recursive: bool,
    /// Depth assigned to `path` itself.
    pub depth: usize,
    pub max_depth: usize,
    pub file_extension: String,
    pub ignore_patterns: Vec<Pattern>,
    pub dry_run: bool,
    pub fail_fast: bool,
    pub strategy: ReplaceStrategy,
}

impl Options {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Options {
            path: path.into(),
            recursive: true,
            depth: 0,
            max_depth: MAX_DEPTH_RECUR,
            file_extension: DEFAULT_EXTENSION.to_string(),
            ignore_patterns: Vec::new(),
            dry_run: false,
            fail_fast: false,
            strategy: ReplaceStrategy::platform_default(),
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            depth: self.depth,
            max_depth: self.max_depth.min(MAX_DEPTH_RECUR),
            extension: self.file_extension.clone(),
            ignore_patterns: self.ignore_patterns.clone(),
        }
    }
}

pub fn parse_patterns(raw: &[String]) -> Result<Vec<Pattern>, ReformatError> {
    raw.iter()
        .map(|s| {
            Pattern::new(s).map_err(|source| ReformatError::InvalidPattern {
                pattern: s.clone(),
                source,
            })
        })
        .collect()
}

pub fn build_options(args: &Args) -> Result<Options> {
    Ok(Options {
        recursive: !args.no_recursive,
        max_depth: args.max_depth.min(MAX_DEPTH_RECUR),
        file_extension: args.extension.clone(),
        ignore_patterns: parse_patterns(&args.ignore)?,
        dry_run: args.dry_run,
        fail_fast: args.fail_fast,
        ..Options::new(&args.path)
    })
}
