//! Shared per-kind symbol catalog.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::LensConfig;
use crate::index::DirectoryIndex;
use crate::kind::DocumentKind;
use crate::scan::{scan_kind, SymbolInfo};

struct CatalogEntry {
    symbols: Vec<SymbolInfo>,
    scanned_at: Instant,
}

/// Symbols of every kind, each kind replaced wholesale on rescan.
///
/// Owned by the lens provider and passed by reference to whatever needs
/// it; there is no ambient global state.
pub struct SymbolCatalog {
    entries: HashMap<DocumentKind, CatalogEntry>,
    stale: HashSet<DocumentKind>,
    ttl: Duration,
}

impl SymbolCatalog {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale: HashSet::new(),
            ttl,
        }
    }

    /// Symbols of `kind` from the last scan (empty if never scanned).
    pub fn get(&self, kind: DocumentKind) -> &[SymbolInfo] {
        self.entries
            .get(&kind)
            .map(|entry| entry.symbols.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the symbols of `kind`.
    pub fn replace(&mut self, kind: DocumentKind, symbols: Vec<SymbolInfo>) {
        self.entries.insert(
            kind,
            CatalogEntry {
                symbols,
                scanned_at: Instant::now(),
            },
        );
        self.stale.remove(&kind);
    }

    /// Whether `kind` was never scanned, has expired, or was marked stale.
    pub fn is_stale(&self, kind: DocumentKind) -> bool {
        if self.stale.contains(&kind) {
            return true;
        }
        match self.entries.get(&kind) {
            Some(entry) => entry.scanned_at.elapsed() >= self.ttl,
            None => true,
        }
    }

    /// Mark `kind` for rescan on next use. Current symbols stay readable.
    pub fn invalidate(&mut self, kind: DocumentKind) {
        self.stale.insert(kind);
    }

    /// Rescan `kind` unconditionally.
    pub async fn scan(
        &mut self,
        kind: DocumentKind,
        index: &mut DirectoryIndex,
        config: &LensConfig,
    ) -> &[SymbolInfo] {
        let symbols = scan_kind(kind, index, config).await;
        self.replace(kind, symbols);
        self.get(kind)
    }

    /// Rescan `kind` only when stale.
    pub async fn refresh(
        &mut self,
        kind: DocumentKind,
        index: &mut DirectoryIndex,
        config: &LensConfig,
    ) -> &[SymbolInfo] {
        if self.is_stale(kind) {
            self.scan(kind, index, config).await
        } else {
            self.get(kind)
        }
    }

    /// Look up a symbol by kind and name.
    pub fn find(&self, kind: DocumentKind, name: &str) -> Option<&SymbolInfo> {
        self.get(kind).iter().find(|symbol| symbol.name == name)
    }

    /// Every catalogued symbol defined in `path`, across kinds.
    pub fn defined_in(&self, path: &Path) -> Vec<&SymbolInfo> {
        let mut kinds: Vec<&DocumentKind> = self.entries.keys().collect();
        kinds.sort();
        kinds
            .into_iter()
            .flat_map(|kind| self.get(*kind))
            .filter(|symbol| symbol.defining_path == path)
            .collect()
    }
}
