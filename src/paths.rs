//! Path normalisation and validation utilities.
//!
//! Import resolution compares paths lexically (no file-system access), so
//! `normalize_lexically` folds `.` and `..` components. Watcher events are
//! validated against the project root before they can touch any cache.

use camino::Utf8PathBuf;
use std::path::{Component, Path, PathBuf};

/// Error types for path validation.
#[derive(Debug, thiserror::Error)]
pub enum PathValidationError {
    /// Path cannot be canonicalized (doesn't exist or permission denied)
    #[error("cannot canonicalize path: {0}")]
    CannotCanonicalize(String),

    /// Resolved path escapes the project root
    #[error("path escapes project root: {0} (root: {1})")]
    OutsideRoot(String, String),
}

/// Fold `.` and `..` components without touching the file system.
///
/// A `..` at the start of a relative path is kept; a `..` directly under
/// the root is dropped.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => true,
                    _ => false,
                };
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether two paths name the same file, after lexical normalisation.
pub fn same_file(a: &Path, b: &Path) -> bool {
    normalize_lexically(a) == normalize_lexically(b)
}

/// Forward-slash path of `path` relative to `root`.
///
/// Falls back to the full path when `path` is not under `root`.
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    match Utf8PathBuf::from_path_buf(rel.to_path_buf()) {
        Ok(utf8) => utf8.as_str().replace('\\', "/"),
        Err(raw) => raw.to_string_lossy().replace('\\', "/"),
    }
}

/// Directory segments of `path` relative to `root` (file name excluded).
pub fn relative_dir_segments(path: &Path, root: &Path) -> Vec<String> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parent = rel.parent().unwrap_or_else(|| Path::new(""));
    parent
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Validate that a path is within the given root directory.
///
/// The path is canonicalised first, so it must exist. Deleted files are
/// checked lexically instead, via [`is_lexically_within`].
pub fn validate_path_within_root(path: &Path, root: &Path) -> Result<PathBuf, PathValidationError> {
    let canonical_path = std::fs::canonicalize(path)
        .map_err(|_| PathValidationError::CannotCanonicalize(path.to_string_lossy().to_string()))?;
    let canonical_root = std::fs::canonicalize(root)
        .map_err(|_| PathValidationError::CannotCanonicalize(root.to_string_lossy().to_string()))?;

    if !canonical_path.starts_with(&canonical_root) {
        return Err(PathValidationError::OutsideRoot(
            canonical_path.to_string_lossy().to_string(),
            canonical_root.to_string_lossy().to_string(),
        ));
    }

    Ok(canonical_path)
}

/// Lexical containment check, usable for paths that no longer exist.
pub fn is_lexically_within(path: &Path, root: &Path) -> bool {
    normalize_lexically(path).starts_with(normalize_lexically(root))
}
