//! Directory ignore rules and candidate-file filtering.
//!
//! This is the one definition of what the directory index and every resolver
//! skip. Precedence:
//! 1. Hard internal ignores (dependency, build cache, output, VCS dirs)
//! 2. Directories belonging to other logical kinds (per search)
//! 3. Gitignore-style rules (.gitignore, .ignore)
//! 4. Include globs (if any provided)

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{LensError, Result};
use crate::kind::DocumentKind;

/// Dependency, build-cache, output and VCS directories (always ignored).
pub const INTERNAL_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".nuxt",
    ".output",
    ".data",
    "dist",
    ".git",
    ".cache",
    ".vercel",
    ".netlify",
    "coverage",
];

/// Directories owned by other logical kinds; never treated as nested
/// instances of the kind being searched.
pub const OTHER_KIND_DIRS: &[&str] = &[
    "utils", "lib", "stores", "store", "public", "config", "assets", "server",
];

/// Non-code directories excluded from every reference search.
const NON_CODE_DIRS: &[&str] = &["public", "assets"];

/// Reason why a path was skipped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Path is not a regular file
    NotAFile,
    /// Dependency/build/output directory
    IgnoredInternal,
    /// Directory owned by another logical kind
    OtherKindDir,
    /// Matched by gitignore-style rules
    IgnoredByGitignore,
    /// Not matched by any include glob
    ExcludedByGlob,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NotAFile => "not a regular file",
            SkipReason::IgnoredInternal => "internal ignore rule",
            SkipReason::OtherKindDir => "other-kind directory",
            SkipReason::IgnoredByGitignore => "matched by gitignore",
            SkipReason::ExcludedByGlob => "excluded by pattern",
        };
        f.write_str(text)
    }
}

/// Directory-segment ignore set.
///
/// `internal` segments are always skipped. `other_kinds` segments are
/// skipped unless they are the basename currently being searched for.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    internal: Vec<String>,
    other_kinds: Vec<String>,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl IgnoreSet {
    /// Build the ignore set, appending `extra` directory names to the
    /// internal list.
    pub fn new(extra: &[String]) -> Self {
        let mut internal: Vec<String> = INTERNAL_IGNORE_DIRS.iter().map(|s| s.to_string()).collect();
        internal.extend(extra.iter().cloned());
        Self {
            internal,
            other_kinds: OTHER_KIND_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Ignore set used when searching for directories named `target`.
    ///
    /// The target basename (and its aliases, e.g. `store`/`stores`) is
    /// removed from the other-kind list so it can still be found.
    pub fn for_dir_search(&self, target: &str) -> Self {
        let aliases: Vec<&str> = DocumentKind::ALL
            .iter()
            .map(|k| k.dir_names())
            .find(|names| names.contains(&target))
            .map(|names| names.to_vec())
            .unwrap_or_else(|| vec![target]);
        Self {
            internal: self.internal.clone(),
            other_kinds: self
                .other_kinds
                .iter()
                .filter(|d| !aliases.contains(&d.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Ignore set for candidate-file searches of `kind`'s references.
    ///
    /// Component usages live only in UI files, so every other-kind directory
    /// is skipped; script-level kinds may be used from stores, utils and
    /// server code, so only non-code directories are.
    pub fn for_reference_search(&self, kind: DocumentKind) -> Self {
        let other_kinds = match kind {
            DocumentKind::Component | DocumentKind::Layout => self.other_kinds.clone(),
            _ => NON_CODE_DIRS.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            internal: self.internal.clone(),
            other_kinds,
        }
    }

    /// Ignore set for file-change events: only dependency/output and
    /// non-code directories are dropped.
    pub fn for_watching(&self) -> Self {
        Self {
            internal: self.internal.clone(),
            other_kinds: NON_CODE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Skip reason for a single directory name, if any.
    pub fn segment_reason(&self, name: &str) -> Option<SkipReason> {
        if self.internal.iter().any(|d| d == name) {
            Some(SkipReason::IgnoredInternal)
        } else if self.other_kinds.iter().any(|d| d == name) {
            Some(SkipReason::OtherKindDir)
        } else {
            None
        }
    }

    /// Skip reason for a path relative to the walk root, checking every
    /// directory segment.
    pub fn path_reason(&self, rel: &Path) -> Option<SkipReason> {
        rel.components().find_map(|c| match c {
            Component::Normal(name) => self.segment_reason(&name.to_string_lossy()),
            _ => None,
        })
    }
}

/// Candidate-file filter for one reference search.
pub struct FileFilter {
    root: PathBuf,
    ignore: IgnoreSet,
    gitignore: Option<Gitignore>,
    include: Option<GlobSet>,
}

impl FileFilter {
    /// Create a filter rooted at `root`.
    ///
    /// # Arguments
    /// * `root` - Project root; include globs are matched against paths relative to it
    /// * `include_patterns` - Globs a file must match (empty = every file)
    /// * `ignore` - Directory ignore set
    /// * `gitignore_aware` - Honour `.gitignore` / `.ignore` at the root
    pub fn new(
        root: &Path,
        include_patterns: &[&str],
        ignore: IgnoreSet,
        gitignore_aware: bool,
    ) -> Result<Self> {
        let gitignore = if gitignore_aware {
            Self::load_gitignore(root)?
        } else {
            None
        };

        let include = if include_patterns.is_empty() {
            None
        } else {
            Some(Self::compile_globs(include_patterns)?)
        };

        Ok(Self {
            root: root.to_path_buf(),
            ignore,
            gitignore,
            include,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load gitignore-style rules from .gitignore and .ignore files.
    fn load_gitignore(root: &Path) -> Result<Option<Gitignore>> {
        let mut builder = GitignoreBuilder::new(root);
        let mut any = false;

        for name in [".gitignore", ".ignore"] {
            let path = root.join(name);
            if path.is_file() {
                // A malformed ignore file should not stop the search.
                if let Some(err) = builder.add(&path) {
                    log::warn!("Failed to load {}: {}", path.display(), err);
                } else {
                    any = true;
                }
            }
        }

        if !any {
            return Ok(None);
        }
        Ok(Some(builder.build()?))
    }

    fn compile_globs(patterns: &[&str]) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| LensError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| LensError::InvalidGlob {
            pattern: patterns.join(","),
            source,
        })
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Whether a directory should be descended into during a walk.
    pub fn should_descend(&self, dir: &Path) -> bool {
        let rel = self.relative(dir);
        if rel.as_os_str().is_empty() {
            return true;
        }
        if self.ignore.path_reason(rel).is_some() {
            return false;
        }
        match &self.gitignore {
            Some(gi) if !rel.has_root() => !gi.matched(rel, true).is_ignore(),
            _ => true,
        }
    }

    /// Check if a file should be skipped, returning the reason if so.
    pub fn should_skip(&self, path: &Path) -> Option<SkipReason> {
        if !path.is_file() {
            return Some(SkipReason::NotAFile);
        }
        self.excluded(path, false)
    }

    /// Skip reason for `path` without touching the file system, so it also
    /// works for paths that were just deleted.
    pub fn excluded(&self, path: &Path, is_dir: bool) -> Option<SkipReason> {
        let rel = self.relative(path);
        let dirs = if is_dir { Some(rel) } else { rel.parent() };
        if let Some(dirs) = dirs {
            if let Some(reason) = self.ignore.path_reason(dirs) {
                return Some(reason);
            }
        }

        if let Some(gi) = self.gitignore.as_ref().filter(|_| !rel.has_root()) {
            if gi.matched_path_or_any_parents(rel, is_dir).is_ignore() {
                return Some(SkipReason::IgnoredByGitignore);
            }
        }

        if let Some(include) = &self.include {
            if !is_dir && !include.is_match(rel) {
                return Some(SkipReason::ExcludedByGlob);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_internal_dirs_always_ignored() {
        let set = IgnoreSet::default();
        assert_eq!(set.segment_reason("node_modules"), Some(SkipReason::IgnoredInternal));
        assert_eq!(set.segment_reason(".nuxt"), Some(SkipReason::IgnoredInternal));
        assert_eq!(set.segment_reason("components"), None);
    }

    #[test]
    fn test_dir_search_keeps_target_and_aliases() {
        let set = IgnoreSet::default();
        assert_eq!(set.segment_reason("stores"), Some(SkipReason::OtherKindDir));

        let for_stores = set.for_dir_search("stores");
        assert_eq!(for_stores.segment_reason("stores"), None);
        assert_eq!(for_stores.segment_reason("store"), None);
        assert_eq!(for_stores.segment_reason("utils"), Some(SkipReason::OtherKindDir));

        let for_components = set.for_dir_search("components");
        assert_eq!(for_components.segment_reason("store"), Some(SkipReason::OtherKindDir));
    }

    #[test]
    fn test_reference_search_scope() {
        let set = IgnoreSet::default();
        let component = set.for_reference_search(DocumentKind::Component);
        assert_eq!(component.segment_reason("server"), Some(SkipReason::OtherKindDir));

        let store = set.for_reference_search(DocumentKind::Store);
        assert_eq!(store.segment_reason("utils"), None);
        assert_eq!(store.segment_reason("public"), Some(SkipReason::OtherKindDir));
        assert_eq!(store.segment_reason("node_modules"), Some(SkipReason::IgnoredInternal));
    }

    #[test]
    fn test_excluded_works_for_missing_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let filter = FileFilter::new(root, &[], IgnoreSet::default().for_watching(), false).unwrap();
        assert_eq!(filter.excluded(&root.join("utils/gone.ts"), false), None);
        assert_eq!(
            filter.excluded(&root.join(".nuxt/gen.ts"), false),
            Some(SkipReason::IgnoredInternal)
        );
        assert_eq!(
            filter.excluded(&root.join("node_modules"), true),
            Some(SkipReason::IgnoredInternal)
        );
    }

    #[test]
    fn test_extra_ignored_dirs() {
        let set = IgnoreSet::new(&["generated".to_string()]);
        assert_eq!(set.segment_reason("generated"), Some(SkipReason::IgnoredInternal));
    }

    #[test]
    fn test_path_reason_checks_every_segment() {
        let set = IgnoreSet::default();
        assert_eq!(
            set.path_reason(Path::new("src/store/components")),
            Some(SkipReason::OtherKindDir)
        );
        assert_eq!(set.path_reason(Path::new("layers/base/components")), None);
    }

    #[test]
    fn test_should_skip_and_include() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("pages/index.vue"), "<template />").unwrap();
        fs::write(root.join("pages/helper.ts"), "").unwrap();
        fs::write(root.join("node_modules/pkg/a.vue"), "").unwrap();

        let filter = FileFilter::new(root, &["**/*.vue"], IgnoreSet::default(), false).unwrap();
        assert_eq!(filter.should_skip(&root.join("pages/index.vue")), None);
        assert_eq!(
            filter.should_skip(&root.join("pages/helper.ts")),
            Some(SkipReason::ExcludedByGlob)
        );
        assert_eq!(
            filter.should_skip(&root.join("node_modules/pkg/a.vue")),
            Some(SkipReason::IgnoredInternal)
        );
        assert_eq!(filter.should_skip(&root.join("pages")), Some(SkipReason::NotAFile));
    }

    #[test]
    fn test_gitignore_filtering() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "generated/\nscratch.ts\n").unwrap();
        fs::create_dir_all(root.join("generated")).unwrap();
        fs::write(root.join("generated/a.ts"), "").unwrap();
        fs::write(root.join("scratch.ts"), "").unwrap();
        fs::write(root.join("kept.ts"), "").unwrap();

        let filter = FileFilter::new(root, &[], IgnoreSet::default(), true).unwrap();
        assert!(!filter.should_descend(&root.join("generated")));
        assert_eq!(
            filter.should_skip(&root.join("scratch.ts")),
            Some(SkipReason::IgnoredByGitignore)
        );
        assert_eq!(filter.should_skip(&root.join("kept.ts")), None);
    }

    #[test]
    fn test_invalid_glob_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileFilter::new(temp_dir.path(), &["a/[b"], IgnoreSet::default(), false);
        assert!(matches!(result, Err(LensError::InvalidGlob { .. })));
    }
}
