//! Integration tests for directory collection.
//!
//! Each test builds a throwaway tree under a `TempDir` and checks which
//! files `collect_files` selects.

use std::fs;
use std::path::{Path, PathBuf};

use docreformat::{collect_files, ReformatError, ScanOptions, MAX_DEPTH_RECUR};
use glob::Pattern;
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, "x = 1\n").unwrap();
    path
}

fn rel_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

// =============================================================================
// Extension filtering
// =============================================================================

#[test]
fn test_only_matching_extension_is_collected() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "a.py");
    touch(root, "b.txt");
    touch(root, "pkg/c.py");
    touch(root, "pkg/c.pyc");
    touch(root, "pkg/deep/d.py");
    touch(root, "pkg/deep/README.md");

    let result = collect_files(root, &ScanOptions::new(".py")).unwrap();

    assert_eq!(
        rel_names(root, &result.files),
        vec!["a.py", "pkg/c.py", "pkg/deep/d.py"]
    );
    assert!(result.errors.is_empty());
}

#[test]
fn test_subdirectories_are_expanded_in_place() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "a.py");
    touch(root, "m/inner.py");
    touch(root, "z.py");

    let result = collect_files(root, &ScanOptions::new(".py")).unwrap();

    assert_eq!(rel_names(root, &result.files), vec!["a.py", "m/inner.py", "z.py"]);
}

#[test]
fn test_non_recursive_stays_at_top_level() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "a.py");
    touch(root, "pkg/b.py");

    let opts = ScanOptions {
        recursive: false,
        ..ScanOptions::new(".py")
    };
    let result = collect_files(root, &opts).unwrap();

    assert_eq!(rel_names(root, &result.files), vec!["a.py"]);
}

// =============================================================================
// Single paths and errors
// =============================================================================

#[test]
fn test_single_file_is_returned_regardless_of_extension() {
    let dir = TempDir::new().unwrap();
    let file = touch(dir.path(), "notes.txt");

    let result = collect_files(&file, &ScanOptions::new(".py")).unwrap();

    assert_eq!(result.files, vec![file]);
}

#[test]
fn test_dash_sentinel_passes_through() {
    let result = collect_files(Path::new("-"), &ScanOptions::new(".py")).unwrap();
    assert_eq!(result.files, vec![PathBuf::from("-")]);
}

#[test]
fn test_missing_path_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = collect_files(&missing, &ScanOptions::new(".py")).unwrap_err();

    assert!(matches!(err, ReformatError::PathNotFound { path } if path == missing));
}

// =============================================================================
// Depth ceiling
// =============================================================================

#[test]
fn test_depth_ceiling_skips_deeper_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "top.py");
    touch(root, "l1/one.py");
    touch(root, "l1/l2/two.py");
    touch(root, "l1/l2/l3/three.py");

    let opts = ScanOptions {
        max_depth: 2,
        ..ScanOptions::new(".py")
    };
    let result = collect_files(root, &opts).unwrap();

    assert_eq!(
        rel_names(root, &result.files),
        vec!["l1/l2/two.py", "l1/one.py", "top.py"]
    );
}

#[test]
fn test_start_depth_counts_against_ceiling() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "top.py");
    touch(root, "l1/one.py");

    let opts = ScanOptions {
        depth: MAX_DEPTH_RECUR,
        ..ScanOptions::new(".py")
    };
    let result = collect_files(root, &opts).unwrap();

    assert_eq!(rel_names(root, &result.files), vec!["top.py"]);
}

#[test]
fn test_tree_deeper_than_hard_ceiling_terminates() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let mut rel = String::new();
    for _ in 0..(MAX_DEPTH_RECUR + 5) {
        rel.push_str("d/");
    }
    let deepest = touch(root, &format!("{rel}deep.py"));
    let mut at_ceiling = String::new();
    for _ in 0..MAX_DEPTH_RECUR {
        at_ceiling.push_str("d/");
    }
    let last_visible = touch(root, &format!("{at_ceiling}edge.py"));

    let opts = ScanOptions {
        max_depth: usize::MAX,
        ..ScanOptions::new(".py")
    };
    let result = collect_files(root, &opts).unwrap();

    assert!(result.files.contains(&last_visible));
    assert!(!result.files.contains(&deepest));
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_terminates() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "pkg/mod.py");
    std::os::unix::fs::symlink(root.join("pkg"), root.join("pkg/again")).unwrap();

    let result = collect_files(root, &ScanOptions::new(".py")).unwrap();

    assert_eq!(rel_names(root, &result.files), vec!["pkg/mod.py"]);
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0], ReformatError::Traversal { .. }));
}

// =============================================================================
// Ignore patterns
// =============================================================================

#[test]
fn test_ignore_patterns_prune_files_and_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "keep.py");
    touch(root, "gen_pb2.py");
    touch(root, "build/lib/copy.py");

    let opts = ScanOptions {
        ignore_patterns: vec![Pattern::new("*_pb2.py").unwrap(), Pattern::new("build").unwrap()],
        ..ScanOptions::new(".py")
    };
    let result = collect_files(root, &opts).unwrap();

    assert_eq!(rel_names(root, &result.files), vec!["keep.py"]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped_and_reported() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "a/one.py");
    touch(root, "locked/hidden.py");
    touch(root, "z/two.py");
    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not stop a privileged user.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = collect_files(root, &ScanOptions::new(".py"));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let result = result.unwrap();

    assert_eq!(rel_names(root, &result.files), vec!["a/one.py", "z/two.py"]);
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(
        &result.errors[0],
        ReformatError::Traversal { path, .. } if path == &locked
    ));
}
