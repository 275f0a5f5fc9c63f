//! Lens provider.
//!
//! Turns an open document into lenses: one per declaration anchor, each
//! labelled with its reference count and carrying a jump command. Owns
//! the session state (project root, directory index, symbol catalog,
//! reference cache) and keeps it current from watcher batches.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::cache::{CacheKey, CacheStats, Locations, ReferenceCache};
use crate::config::{LensConfig, RootPolicy, CONFIG_FILE_NAME};
use crate::error::{LensError, Result};
use crate::index::{DirectoryIndex, IgnoreSet};
use crate::io::read_text;
use crate::kind::{classify, is_global_middleware, DocumentKind};
use crate::naming::{component_name_from_path, layout_name_from_path, module_name_from_file};
use crate::patterns::{
    component_anchor, defines_store, export_declarations, layout_anchor, middleware_anchor,
    plugin_anchor, store_definitions,
};
use crate::project::{find_project_root, ProjectRoot};
use crate::resolve::{resolve, ReferenceLocation, ResolveContext, SymbolQuery};
use crate::scan::{SymbolCatalog, SymbolInfo};
use crate::seed::{NoSeed, ReferenceSeed};
use crate::text::LineIndex;
use crate::watcher::{EventType, WatcherBatch};

/// An open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a document from disk.
    pub async fn open(path: &Path) -> Option<Self> {
        let text = read_text(path).await?;
        Some(Self::new(path, text))
    }
}

/// A 1-indexed line and 0-indexed byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

/// Arguments of the jump-to-references command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JumpCommand {
    pub document: PathBuf,
    pub position: Position,
    pub locations: Locations,
}

/// One annotation above a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lens {
    pub kind: DocumentKind,
    pub symbol: String,
    pub anchor: Position,
    pub label: String,
    /// `None` for informational lenses and zero-reference lenses
    pub command: Option<JumpCommand>,
}

impl Lens {
    pub fn reference_count(&self) -> usize {
        self.command.as_ref().map(|c| c.locations.len()).unwrap_or(0)
    }
}

/// Label for `count` references of `kind`.
pub fn reference_label(kind: DocumentKind, count: usize) -> String {
    let noun = if count == 1 { "reference" } else { "references" };
    format!("{} {} {}", kind.icon(), count, noun)
}

/// A declaration site found in the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Anchor {
    symbol: String,
    /// Where the lens sits
    offset: usize,
    /// Where the native provider is asked (the declared name)
    name_offset: usize,
    /// Declaration pattern that matched; part of the cache key
    context: &'static str,
    informational: bool,
}

impl Anchor {
    fn at(symbol: String, offset: usize, context: &'static str) -> Self {
        Self {
            symbol,
            offset,
            name_offset: offset,
            context,
            informational: false,
        }
    }
}

/// Session orchestrator.
pub struct LensProvider {
    config: LensConfig,
    root: ProjectRoot,
    ignore: IgnoreSet,
    index: Option<DirectoryIndex>,
    catalog: SymbolCatalog,
    cache: ReferenceCache,
    seed: Box<dyn ReferenceSeed>,
}

impl LensProvider {
    /// Provider whose project root is discovered from the first document.
    pub fn new(config: LensConfig) -> Self {
        Self {
            ignore: IgnoreSet::new(&config.extra_ignored_dirs),
            catalog: SymbolCatalog::new(config.catalog_ttl()),
            cache: ReferenceCache::new(config.reference_ttl(), config.invalidation),
            root: ProjectRoot::new(),
            index: None,
            seed: Box::new(NoSeed),
            config,
        }
    }

    /// Provider for a known project root.
    pub fn with_root(root: PathBuf, config: LensConfig) -> Self {
        let mut provider = Self::new(config);
        provider.index = Some(provider.new_index(&root));
        provider.root = ProjectRoot::with_root(root);
        provider
    }

    /// Discover the project root above `path`, load its configuration and
    /// build a provider for it.
    pub fn open(path: &Path) -> Result<Self> {
        let not_found = || LensError::RootNotFound(path.to_path_buf());
        let root = find_project_root(path, RootPolicy::default()).ok_or_else(not_found)?;
        let config = LensConfig::load(&root)?;
        let root = if config.root_policy == RootPolicy::default() {
            root
        } else {
            find_project_root(path, config.root_policy).ok_or_else(not_found)?
        };
        Ok(Self::with_root(root, config))
    }

    /// Use a host-native reference provider as the composable/utility seed.
    pub fn with_seed(mut self, seed: Box<dyn ReferenceSeed>) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.get()
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn cache_stats(&self, kind: DocumentKind) -> CacheStats {
        self.cache.stats(kind)
    }

    fn new_index(&self, root: &Path) -> DirectoryIndex {
        DirectoryIndex::new(root, self.ignore.clone(), self.config.directory_ttl())
    }

    /// Project root for `path`, discovering it on first use.
    fn ensure_root(&mut self, path: &Path) -> Option<PathBuf> {
        let root = self
            .root
            .get_or_discover(path, self.config.root_policy)?
            .to_path_buf();
        if self.index.is_none() {
            self.index = Some(self.new_index(&root));
        }
        Some(root)
    }

    /// Catalog of `kind`, rescanned if stale.
    pub async fn symbols(&mut self, kind: DocumentKind) -> Vec<SymbolInfo> {
        let Some(index) = self.index.as_mut() else {
            return Vec::new();
        };
        self.catalog.refresh(kind, index, &self.config).await.to_vec()
    }

    /// Uncached reference search for `query`.
    pub async fn references(&mut self, query: &SymbolQuery) -> Vec<ReferenceLocation> {
        if self.root.get().is_none() {
            if let Some(path) = query.defining_path.as_deref() {
                self.ensure_root(path);
            }
        }
        let Some(root) = self.root.get().map(Path::to_path_buf) else {
            return Vec::new();
        };
        let mut query = query.clone();
        if let Some(path) = query.defining_path.clone() {
            self.symbols(query.kind).await;
            if let Some(auto) = self.auto_import_flag(query.kind, &query.name, &path) {
                query.auto_imported = auto;
            }
        }
        let ctx = ResolveContext::new(&root, &self.config, &self.ignore, self.seed.as_ref());
        resolve(&query, &ctx).await
    }

    /// Catalogued auto-import flag of `name` declared in `path`.
    fn auto_import_flag(&self, kind: DocumentKind, name: &str, path: &Path) -> Option<bool> {
        let symbol = match self.catalog.find(kind, name) {
            Some(symbol) if symbol.defining_path == path => symbol,
            _ => self
                .catalog
                .defined_in(path)
                .into_iter()
                .find(|symbol| symbol.name == name)?,
        };
        Some(symbol.is_auto_imported)
    }

    /// Lenses for `doc`.
    ///
    /// Shell files and documents outside any project produce none. Results
    /// are served from the reference cache while it is fresh, so repeated
    /// calls on an unchanged project share the same location lists.
    pub async fn provide_lenses(&mut self, doc: &Document) -> Vec<Lens> {
        let Some(root) = self.ensure_root(&doc.path) else {
            return Vec::new();
        };
        let mut kinds = classify(&doc.path, &root);
        if kinds.is_empty() {
            return Vec::new();
        }
        if !kinds.contains(&DocumentKind::Store) && defines_store(&doc.text) {
            kinds.push(DocumentKind::Store);
        }

        let lines = LineIndex::new(&doc.text);
        let mut lenses = Vec::new();
        for kind in kinds {
            self.symbols(kind).await;
            for anchor in self.anchors(kind, doc).await {
                lenses.push(self.lens_for(kind, doc, &root, &lines, anchor).await);
            }
        }
        lenses.sort_by_key(|lens| (lens.anchor.line, lens.anchor.col));
        lenses
    }

    async fn lens_for(
        &mut self,
        kind: DocumentKind,
        doc: &Document,
        root: &Path,
        lines: &LineIndex,
        anchor: Anchor,
    ) -> Lens {
        let (line, col) = lines.position(anchor.offset);
        let position = Position { line, col };

        if anchor.informational {
            return Lens {
                kind,
                symbol: anchor.symbol,
                anchor: position,
                label: format!("{} global middleware (runs on every route)", kind.icon()),
                command: None,
            };
        }

        let key = CacheKey::new(&doc.path, &anchor.symbol, anchor.context);
        let locations = match self.cache.get(kind, &key) {
            Some(hit) => hit,
            None => {
                let (name_line, name_col) = lines.position(anchor.name_offset);
                let auto_imported = self
                    .auto_import_flag(kind, &anchor.symbol, &doc.path)
                    .unwrap_or(true);
                let query = SymbolQuery::new(&anchor.symbol, kind)
                    .defined_in(&doc.path)
                    .at(name_line, name_col)
                    .auto_imported(auto_imported);
                let ctx = ResolveContext::new(root, &self.config, &self.ignore, self.seed.as_ref());
                let found: Locations = Arc::from(resolve(&query, &ctx).await);
                self.cache.put(kind, key, Arc::clone(&found));
                found
            }
        };

        let label = reference_label(kind, locations.len());
        let command = if locations.is_empty() {
            None
        } else {
            Some(JumpCommand {
                document: doc.path.clone(),
                position,
                locations,
            })
        };
        Lens {
            kind,
            symbol: anchor.symbol,
            anchor: position,
            label,
            command,
        }
    }

    /// Declaration sites of `kind` in `doc`.
    async fn anchors(&mut self, kind: DocumentKind, doc: &Document) -> Vec<Anchor> {
        let text = doc.text.as_str();
        let (context, offset) = match kind {
            DocumentKind::Store => {
                return store_definitions(text)
                    .into_iter()
                    .map(|def| Anchor::at(def.id, def.offset, "defineStore"))
                    .collect()
            }
            DocumentKind::Composable | DocumentKind::Utility => {
                if defines_store(text) {
                    return Vec::new();
                }
                return export_declarations(text)
                    .into_iter()
                    .map(|decl| Anchor {
                        name_offset: decl.name_range.start,
                        ..Anchor::at(decl.name, decl.offset, decl.kind.as_str())
                    })
                    .collect();
            }
            DocumentKind::Component => ("component", component_anchor(text)),
            DocumentKind::Layout => ("layout", layout_anchor(text)),
            DocumentKind::Plugin => ("defineNuxtPlugin", plugin_anchor(text)),
            DocumentKind::Middleware => ("defineNuxtRouteMiddleware", middleware_anchor(text)),
        };

        let Some(offset) = offset else {
            return Vec::new();
        };
        let Some(name) = self.path_symbol(kind, &doc.path).await else {
            return Vec::new();
        };
        let informational = kind == DocumentKind::Middleware && is_global_middleware(&doc.path);
        vec![Anchor {
            informational,
            ..Anchor::at(name, offset, context)
        }]
    }

    /// Name of a path-named symbol: the catalog entry for `path` if
    /// scanned, otherwise derived from the containing kind directory.
    async fn path_symbol(&mut self, kind: DocumentKind, path: &Path) -> Option<String> {
        if let Some(symbol) = self.catalog.get(kind).iter().find(|s| s.defining_path == path) {
            return Some(symbol.name.clone());
        }
        match kind {
            DocumentKind::Plugin | DocumentKind::Middleware => module_name_from_file(path),
            DocumentKind::Component | DocumentKind::Layout => {
                let dirs = self.index.as_mut()?.dirs_for(kind.dir_names()).await;
                let dir = dirs
                    .iter()
                    .filter(|dir| path.starts_with(dir))
                    .max_by_key(|dir| dir.components().count())?;
                let relative = path.strip_prefix(dir).ok()?;
                let name = if kind == DocumentKind::Component {
                    component_name_from_path(relative)
                } else {
                    layout_name_from_path(relative)
                };
                (!name.is_empty()).then_some(name)
            }
            _ => None,
        }
    }

    /// Apply a batch of file changes.
    ///
    /// Reference caches are cleared per the invalidation policy, catalogs
    /// of kinds whose directories hold a changed path are marked stale, and
    /// the directory index is dropped when a directory appears or
    /// disappears. A change to `.nuxtlens.json` reloads the configuration
    /// and resets every cache.
    pub fn apply_changes(&mut self, batch: &WatcherBatch) {
        let Some(root) = self.root.get().map(Path::to_path_buf) else {
            return;
        };

        for change in &batch.changes {
            if change.path == root.join(CONFIG_FILE_NAME) {
                self.reload_config(&root);
                continue;
            }

            let cleared = self.cache.invalidate_for_change(&change.path);
            log::debug!(
                "{} {}: cleared {} reference caches",
                change.event_type,
                change.path.display(),
                cleared.len()
            );

            for kind in kinds_touching(&change.path, &root) {
                self.catalog.invalidate(kind);
            }

            if change.is_dir && change.event_type != EventType::Modify {
                if let Some(index) = self.index.as_mut() {
                    index.invalidate();
                }
                for kind in DocumentKind::ALL {
                    self.catalog.invalidate(kind);
                }
            }
        }
    }

    fn reload_config(&mut self, root: &Path) {
        match LensConfig::load(root) {
            Ok(config) => {
                log::info!("Reloaded {}", CONFIG_FILE_NAME);
                let seed = std::mem::replace(&mut self.seed, Box::new(NoSeed));
                *self = Self::with_root(root.to_path_buf(), config).with_seed(seed);
            }
            Err(err) => log::warn!("Keeping previous configuration: {}", err),
        }
    }
}

/// Kinds whose directories contain `path` (or are `path`).
fn kinds_touching(path: &Path, root: &Path) -> Vec<DocumentKind> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    DocumentKind::ALL
        .into_iter()
        .filter(|kind| segments.iter().any(|s| kind.dir_names().contains(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_label() {
        assert_eq!(reference_label(DocumentKind::Composable, 1), "🪝 1 reference");
        assert_eq!(reference_label(DocumentKind::Store, 0), "🗃️ 0 references");
        assert_eq!(reference_label(DocumentKind::Component, 12), "🧩 12 references");
    }

    #[test]
    fn test_kinds_touching() {
        let root = Path::new("/p");
        assert_eq!(
            kinds_touching(Path::new("/p/components/Foo.vue"), root),
            vec![DocumentKind::Component]
        );
        assert_eq!(
            kinds_touching(Path::new("/p/stores"), root),
            vec![DocumentKind::Store]
        );
        assert!(kinds_touching(Path::new("/p/pages/index.vue"), root).is_empty());
    }

    #[tokio::test]
    async fn test_composable_anchors_point_at_declarations() {
        let mut provider = LensProvider::with_root(PathBuf::from("/p"), LensConfig::default());
        let doc = Document::new(
            "/p/composables/useFoo.ts",
            "import x from 'y'\nexport function useFoo() {}\nexport const useBar = () => 1\n",
        );
        let anchors = provider.anchors(DocumentKind::Composable, &doc).await;
        let names: Vec<&str> = anchors.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(names, vec!["useFoo", "useBar"]);
        assert_eq!(anchors[0].offset, doc.text.find("export function").unwrap());
        assert_eq!(anchors[0].name_offset, doc.text.find("useFoo").unwrap());
        assert_eq!(anchors[0].context, "function");
    }

    #[tokio::test]
    async fn test_store_defining_file_has_no_utility_anchors() {
        let mut provider = LensProvider::with_root(PathBuf::from("/p"), LensConfig::default());
        let doc = Document::new(
            "/p/utils/cart.ts",
            "export const useCartStore = defineStore('cart', {})\n",
        );
        assert!(provider.anchors(DocumentKind::Utility, &doc).await.is_empty());
        let stores = provider.anchors(DocumentKind::Store, &doc).await;
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].symbol, "cart");
    }

    #[tokio::test]
    async fn test_global_middleware_anchor_is_informational() {
        let mut provider = LensProvider::with_root(PathBuf::from("/p"), LensConfig::default());
        let doc = Document::new(
            "/p/middleware/track.global.ts",
            "export default defineNuxtRouteMiddleware(() => {})\n",
        );
        let anchors = provider.anchors(DocumentKind::Middleware, &doc).await;
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].symbol, "track");
        assert!(anchors[0].informational);
    }
}
