//! Reference resolution.
//!
//! Given a symbol (name, kind, defining file) find every location in the
//! project that uses it. Each kind has its own detection rules; all of them
//! read candidate files in batches, skip unreadable files, and draw
//! candidates through the shared ignore set.

pub mod component;
pub mod composable;
pub mod imports;
pub mod layout;
pub mod middleware;
pub mod plugin;
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::LensConfig;
use crate::index::{enumerate_files_blocking, extension_glob, FileFilter, IgnoreSet};
use crate::kind::{DocumentKind, COMPONENT_EXTENSIONS, SCRIPT_EXTENSIONS};
use crate::seed::ReferenceSeed;
use crate::text::LineIndex;

/// One textual usage of a symbol.
///
/// Lines are 1-indexed, columns are 0-indexed byte offsets within their
/// line, `byte_start..byte_end` is half-open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceLocation {
    pub file_path: PathBuf,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub byte_start: usize,
    pub byte_end: usize,
}

impl ReferenceLocation {
    /// Location of `range` in a file whose text is indexed by `lines`.
    pub fn from_range(path: &Path, lines: &LineIndex, range: Range<usize>) -> Self {
        let (start_line, start_col) = lines.position(range.start);
        let (end_line, end_col) = lines.position(range.end);
        Self {
            file_path: path.to_path_buf(),
            start_line,
            start_col,
            end_line,
            end_col,
            byte_start: range.start,
            byte_end: range.end,
        }
    }
}

/// Drop duplicate `(file, byte_start)` locations and sort by file, then
/// offset.
pub fn dedupe(mut locations: Vec<ReferenceLocation>) -> Vec<ReferenceLocation> {
    let mut seen = HashSet::new();
    locations.retain(|loc| seen.insert((loc.file_path.clone(), loc.byte_start)));
    locations.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.byte_start.cmp(&b.byte_start))
    });
    locations
}

/// The symbol being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolQuery {
    pub name: String,
    pub kind: DocumentKind,
    pub defining_path: Option<PathBuf>,
    /// Declaration site `(line, col)` for the native provider seed
    pub anchor: Option<(usize, usize)>,
    /// Whether the declaration is reachable through `#imports`
    pub auto_imported: bool,
}

impl SymbolQuery {
    pub fn new(name: &str, kind: DocumentKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            defining_path: None,
            anchor: None,
            auto_imported: true,
        }
    }

    pub fn defined_in(mut self, path: &Path) -> Self {
        self.defining_path = Some(path.to_path_buf());
        self
    }

    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.anchor = Some((line, col));
        self
    }

    pub fn auto_imported(mut self, auto_imported: bool) -> Self {
        self.auto_imported = auto_imported;
        self
    }

    fn is_defining_file(&self, path: &Path) -> bool {
        self.defining_path.as_deref() == Some(path)
    }
}

/// Everything a resolver needs besides the query.
pub struct ResolveContext<'a> {
    pub root: &'a Path,
    pub config: &'a LensConfig,
    pub ignore: &'a IgnoreSet,
    pub seed: &'a dyn ReferenceSeed,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        root: &'a Path,
        config: &'a LensConfig,
        ignore: &'a IgnoreSet,
        seed: &'a dyn ReferenceSeed,
    ) -> Self {
        Self {
            root,
            config,
            ignore,
            seed,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.config.effective_batch_size()
    }

    /// Candidate files for a `kind` search with the given extensions.
    pub async fn candidates(&self, kind: DocumentKind, extensions: &[&str]) -> Vec<PathBuf> {
        let glob = extension_glob(extensions);
        let filter = match FileFilter::new(
            self.root,
            &[glob.as_str()],
            self.ignore.for_reference_search(kind),
            self.config.gitignore_aware,
        ) {
            Ok(filter) => filter,
            Err(err) => {
                log::warn!("Cannot build candidate filter for {}: {}", kind, err);
                return Vec::new();
            }
        };
        enumerate_files_blocking(self.root.to_path_buf(), filter).await
    }

    /// Script and component files.
    pub async fn code_candidates(&self, kind: DocumentKind) -> Vec<PathBuf> {
        let extensions: Vec<&str> = SCRIPT_EXTENSIONS
            .iter()
            .chain(COMPONENT_EXTENSIONS)
            .copied()
            .collect();
        self.candidates(kind, &extensions).await
    }

    /// Component (`.vue`) files.
    pub async fn component_candidates(&self, kind: DocumentKind) -> Vec<PathBuf> {
        self.candidates(kind, COMPONENT_EXTENSIONS).await
    }
}

/// Resolve every reference to `query`.
pub async fn resolve(query: &SymbolQuery, ctx: &ResolveContext<'_>) -> Vec<ReferenceLocation> {
    let locations = match query.kind {
        DocumentKind::Component => component::resolve_component(query, ctx).await,
        DocumentKind::Composable | DocumentKind::Utility => {
            composable::resolve_composable(query, ctx).await
        }
        DocumentKind::Store => store::resolve_store(query, ctx).await,
        DocumentKind::Plugin => plugin::resolve_plugin(query, ctx).await,
        DocumentKind::Middleware => middleware::resolve_middleware(query, ctx).await,
        DocumentKind::Layout => layout::resolve_layout(query, ctx).await,
    };
    dedupe(locations)
}
