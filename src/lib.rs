//
// lib.rs
// docreformat
//
// Library entry that re-exports the walker, the tag rewriter, the safe overwriter and the driver so the binary and tests share them.
//
// Thales Matheus Mendonça Santos - November 2025
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod cli;
pub mod comment;
pub mod error;
pub mod reformat;
pub mod scanner;
pub mod utils;
pub mod writer;

pub use cli::{build_options, Args, Options};
pub use comment::{doxygen_to_epytext, rewrite_lines};
pub use error::{ReformatError, Result};
pub use reformat::{run_reformat, Counters};
pub use scanner::{collect_files, ScanOptions, ScanResult, MAX_DEPTH_RECUR};
pub use writer::{overwrite, ReplaceStrategy};
