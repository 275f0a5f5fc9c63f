//! Symbol scanner.
//!
//! Produces the flat catalog of defined symbols for one document kind.
//! Component, layout, plugin and middleware names come from file paths;
//! composables, utilities and stores are read and pattern-matched.

pub mod catalog;

pub use catalog::SymbolCatalog;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::LensConfig;
use crate::index::{files_in_dirs_blocking, DirectoryIndex, FileFilter};
use crate::io::for_each_batched;
use crate::kind::DocumentKind;
use crate::naming::{component_name_from_path, layout_name_from_path, module_name_from_file};
use crate::patterns::{defines_store, export_declarations, store_definitions};

/// How a symbol was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Const,
    Let,
    Function,
    AsyncFunction,
    Interface,
    Type,
    Enum,
    Class,
    Store,
    Component,
    Plugin,
    Middleware,
    Layout,
}

impl DeclarationKind {
    /// Map an `export` keyword to its declaration kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim_end_matches('*');
        if keyword.starts_with("async") {
            return Some(DeclarationKind::AsyncFunction);
        }
        Some(match keyword {
            "const" => DeclarationKind::Const,
            "let" | "var" => DeclarationKind::Let,
            "function" => DeclarationKind::Function,
            "interface" => DeclarationKind::Interface,
            "type" => DeclarationKind::Type,
            "enum" => DeclarationKind::Enum,
            "class" => DeclarationKind::Class,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Const => "const",
            DeclarationKind::Let => "let",
            DeclarationKind::Function => "function",
            DeclarationKind::AsyncFunction => "async function",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Type => "type",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Class => "class",
            DeclarationKind::Store => "store",
            DeclarationKind::Component => "component",
            DeclarationKind::Plugin => "plugin",
            DeclarationKind::Middleware => "middleware",
            DeclarationKind::Layout => "layout",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One defined symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub defining_path: PathBuf,
    pub is_auto_imported: bool,
    pub declaration_kind: Option<DeclarationKind>,
}

/// Whether a composable/utility file is auto-imported: top-level files and
/// `<sub>/index.*` files are; deeper files are not.
pub fn is_auto_import_path(relative: &Path) -> bool {
    let depth = relative.components().count();
    match depth {
        1 => true,
        2 => relative
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s == "index")
            .unwrap_or(false),
        _ => false,
    }
}

/// The indexed directory holding `path` (innermost wins).
fn containing_dir<'a>(dirs: &'a [PathBuf], path: &Path) -> Option<&'a PathBuf> {
    dirs.iter()
        .filter(|dir| path.starts_with(dir))
        .max_by_key(|dir| dir.components().count())
}

/// Scan every file of `kind` under the indexed directories.
///
/// Per-file read failures are skipped. The result is sorted by path, then
/// name, so repeated scans of an unchanged tree are identical.
pub async fn scan_kind(
    kind: DocumentKind,
    index: &mut DirectoryIndex,
    config: &LensConfig,
) -> Vec<SymbolInfo> {
    let dirs = index.dirs_for(kind.dir_names()).await;
    if dirs.is_empty() {
        return Vec::new();
    }

    let ignore = index.ignore().for_dir_search(kind.dir_names()[0]);
    let filter = match FileFilter::new(index.root(), &[], ignore, config.gitignore_aware) {
        Ok(filter) => filter,
        Err(err) => {
            log::warn!("Cannot build file filter for {} scan: {}", kind, err);
            return Vec::new();
        }
    };
    let files = files_in_dirs_blocking(dirs.clone(), kind.extensions(), filter).await;

    let mut symbols = match kind {
        DocumentKind::Component | DocumentKind::Layout => path_symbols(kind, &dirs, &files),
        DocumentKind::Plugin | DocumentKind::Middleware => path_symbols(kind, &dirs, &files),
        DocumentKind::Composable | DocumentKind::Utility => {
            declaration_symbols(&dirs, &files, config.effective_batch_size()).await
        }
        DocumentKind::Store => store_symbols(&files, config.effective_batch_size()).await,
    };

    symbols.sort_by(|a, b| {
        a.defining_path
            .cmp(&b.defining_path)
            .then_with(|| a.name.cmp(&b.name))
    });
    log::info!("Scanned {} {} symbols", symbols.len(), kind);
    symbols
}

/// Symbols named purely by their path.
fn path_symbols(kind: DocumentKind, dirs: &[PathBuf], files: &[PathBuf]) -> Vec<SymbolInfo> {
    files
        .iter()
        .filter_map(|path| {
            let dir = containing_dir(dirs, path)?;
            let relative = path.strip_prefix(dir).ok()?;
            let (name, declaration_kind) = match kind {
                DocumentKind::Component => {
                    (component_name_from_path(relative), DeclarationKind::Component)
                }
                DocumentKind::Layout => (layout_name_from_path(relative), DeclarationKind::Layout),
                DocumentKind::Plugin => (module_name_from_file(path)?, DeclarationKind::Plugin),
                DocumentKind::Middleware => {
                    (module_name_from_file(path)?, DeclarationKind::Middleware)
                }
                _ => return None,
            };
            if name.is_empty() {
                return None;
            }
            Some(SymbolInfo {
                name,
                defining_path: path.clone(),
                is_auto_imported: true,
                declaration_kind: Some(declaration_kind),
            })
        })
        .collect()
}

/// Exported declarations of composable/utility files. Files that define a
/// store belong to the store catalog and are skipped.
async fn declaration_symbols(
    dirs: &[PathBuf],
    files: &[PathBuf],
    batch_size: usize,
) -> Vec<SymbolInfo> {
    let mut symbols = Vec::new();
    for_each_batched(files, batch_size, |file| {
        if defines_store(&file.text) {
            log::debug!("Skipping store-defining file {}", file.path.display());
            return;
        }
        let auto = containing_dir(dirs, &file.path)
            .and_then(|dir| file.path.strip_prefix(dir).ok())
            .map(is_auto_import_path)
            .unwrap_or(false);
        for decl in export_declarations(&file.text) {
            symbols.push(SymbolInfo {
                name: decl.name,
                defining_path: file.path.clone(),
                is_auto_imported: auto,
                declaration_kind: Some(decl.kind),
            });
        }
    })
    .await;
    symbols
}

/// Store ids from `defineStore` calls.
async fn store_symbols(files: &[PathBuf], batch_size: usize) -> Vec<SymbolInfo> {
    let mut symbols = Vec::new();
    for_each_batched(files, batch_size, |file| {
        for def in store_definitions(&file.text) {
            symbols.push(SymbolInfo {
                name: def.id,
                defining_path: file.path.clone(),
                is_auto_imported: false,
                declaration_kind: Some(DeclarationKind::Store),
            });
        }
    })
    .await;
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IgnoreSet;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn index(root: &Path) -> DirectoryIndex {
        DirectoryIndex::new(root, IgnoreSet::default(), Duration::from_secs(60))
    }

    #[test]
    fn test_declaration_kind_from_keyword() {
        assert_eq!(
            DeclarationKind::from_keyword("async  function"),
            Some(DeclarationKind::AsyncFunction)
        );
        assert_eq!(DeclarationKind::from_keyword("function*"), Some(DeclarationKind::Function));
        assert_eq!(DeclarationKind::from_keyword("var"), Some(DeclarationKind::Let));
        assert_eq!(DeclarationKind::from_keyword("module"), None);
    }

    #[test]
    fn test_auto_import_paths() {
        assert!(is_auto_import_path(Path::new("useFoo.ts")));
        assert!(is_auto_import_path(Path::new("auth/index.ts")));
        assert!(!is_auto_import_path(Path::new("auth/useToken.ts")));
        assert!(!is_auto_import_path(Path::new("a/b/index.ts")));
    }

    #[tokio::test]
    async fn test_scan_components_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "components/Foo/Bar.vue", "<template/>");
        write(root, "components/form/index.vue", "<template/>");
        write(root, "components/helpers.ts", "");
        write(root, "node_modules/x/components/Ext.vue", "");

        let mut index = index(root);
        let symbols = scan_kind(DocumentKind::Component, &mut index, &LensConfig::default()).await;
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["FooBar", "Form"]);
        assert!(symbols.iter().all(|s| s.is_auto_imported));
    }

    #[tokio::test]
    async fn test_scan_composables_skips_store_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "composables/useFoo.ts", "export function useFoo() {}\nexport const FOO = 1");
        write(root, "composables/deep/useDeep.ts", "export async function useDeep() {}");
        write(
            root,
            "composables/useCart.ts",
            "export const useCartStore = defineStore('cart', {})",
        );

        let mut index = index(root);
        let symbols = scan_kind(DocumentKind::Composable, &mut index, &LensConfig::default()).await;
        let names: Vec<(&str, bool)> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.is_auto_imported))
            .collect();
        assert_eq!(names, vec![("useDeep", false), ("FOO", true), ("useFoo", true)]);
    }

    #[tokio::test]
    async fn test_scan_stores_plugins_middleware_layouts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "stores/cart.ts", "export const useCartStore = defineStore('cart', {})");
        write(root, "plugins/auth.client.ts", "export default defineNuxtPlugin(() => {})");
        write(root, "middleware/log.global.ts", "export default defineNuxtRouteMiddleware(() => {})");
        write(root, "layouts/admin/Panel.vue", "<template><slot/></template>");

        let mut index = index(root);
        let config = LensConfig::default();

        let stores = scan_kind(DocumentKind::Store, &mut index, &config).await;
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "cart");
        assert!(!stores[0].is_auto_imported);
        assert_eq!(stores[0].declaration_kind, Some(DeclarationKind::Store));

        let plugins = scan_kind(DocumentKind::Plugin, &mut index, &config).await;
        assert_eq!(plugins[0].name, "auth");

        let middleware = scan_kind(DocumentKind::Middleware, &mut index, &config).await;
        assert_eq!(middleware[0].name, "log");

        let layouts = scan_kind(DocumentKind::Layout, &mut index, &config).await;
        assert_eq!(layouts[0].name, "admin-panel");
    }

    #[tokio::test]
    async fn test_rescan_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "utils/format.ts", "export function fmt() {}\nexport type Fmt = string");
        write(root, "utils/index.ts", "export const a = 1");

        let mut index = index(root);
        let config = LensConfig::default();
        let first = scan_kind(DocumentKind::Utility, &mut index, &config).await;
        let second = scan_kind(DocumentKind::Utility, &mut index, &config).await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
