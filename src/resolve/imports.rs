//! Import specifier resolution.
//!
//! Maps an import source string to the file it names so an import only
//! counts as a reference when it really points at the declaring file.

use std::path::{Path, PathBuf};

use crate::paths::{normalize_lexically, same_file};

/// Root-relative alias prefixes.
pub const ALIAS_PREFIXES: &[&str] = &["~~/", "@@/", "~/", "@/"];

/// Extensions tried, in order, for an extension-less specifier.
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "js", "mjs", "tsx", "jsx", "vue"];

/// Virtual module exposing every auto-import.
pub const AUTO_IMPORTS_MODULE: &str = "#imports";

/// What an import source refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// A project path (not yet checked against the file system)
    Path(PathBuf),
    /// The framework's auto-import module
    AutoImports,
    /// A package or unsupported alias
    External,
}

/// Classify `source` as imported from `from_file`.
pub fn import_target(from_file: &Path, source: &str, root: &Path) -> ImportTarget {
    if source == AUTO_IMPORTS_MODULE {
        return ImportTarget::AutoImports;
    }
    if source.starts_with("./") || source.starts_with("../") {
        let base = from_file.parent().unwrap_or(root);
        return ImportTarget::Path(normalize_lexically(&base.join(source)));
    }
    for prefix in ALIAS_PREFIXES {
        if let Some(rest) = source.strip_prefix(prefix) {
            return ImportTarget::Path(normalize_lexically(&root.join(rest)));
        }
    }
    if matches!(source, "~" | "@" | "~~" | "@@") {
        return ImportTarget::Path(root.to_path_buf());
    }
    ImportTarget::External
}

/// Files a specifier path could name: the path itself, the path with each
/// known extension, then `index` files inside it.
pub fn resolution_candidates(base: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![base.to_path_buf()];
    let file_name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    for ext in RESOLVE_EXTENSIONS {
        candidates.push(base.with_file_name(format!("{}.{}", file_name, ext)));
    }
    for ext in RESOLVE_EXTENSIONS {
        candidates.push(base.join(format!("index.{}", ext)));
    }
    candidates
}

/// Resolve `source` to an existing file, checking with `exists`.
pub fn resolve_with<F>(from_file: &Path, source: &str, root: &Path, exists: F) -> Option<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    match import_target(from_file, source, root) {
        ImportTarget::Path(base) => resolution_candidates(&base)
            .into_iter()
            .find(|candidate| exists(candidate)),
        ImportTarget::AutoImports | ImportTarget::External => None,
    }
}

/// Resolve `source` against the file system.
pub fn resolve_import(from_file: &Path, source: &str, root: &Path) -> Option<PathBuf> {
    resolve_with(from_file, source, root, |p| p.is_file())
}

/// Whether importing `source` from `from_file` reaches `target`.
///
/// `#imports` reaches any auto-imported declaring file. A specifier whose
/// file cannot be found on disk is matched lexically against `target`.
pub fn import_reaches(
    from_file: &Path,
    source: &str,
    root: &Path,
    target: &Path,
    target_auto_imported: bool,
) -> bool {
    match import_target(from_file, source, root) {
        ImportTarget::AutoImports => target_auto_imported,
        ImportTarget::External => false,
        ImportTarget::Path(base) => match resolve_import(from_file, source, root) {
            Some(resolved) => same_file(&resolved, target),
            None => resolution_candidates(&base)
                .iter()
                .any(|candidate| same_file(candidate, target)),
        },
    }
}
