//! Logical document kinds and path classification.
//!
//! A document's kinds are derived once from the directory segments of its
//! root-relative path and its extension, then handed to the kind-specific
//! scanners and resolvers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::LensError;
use crate::paths::relative_dir_segments;

/// Root shell files that never carry lenses.
pub const SHELL_FILES: &[&str] = &["app.vue", "error.vue"];

/// Script extensions scanned for declarations.
pub const SCRIPT_EXTENSIONS: &[&str] = &["ts", "js", "mjs", "mts", "tsx", "jsx"];

/// UI component extensions.
pub const COMPONENT_EXTENSIONS: &[&str] = &["vue"];

/// A logical kind of project document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Component,
    Composable,
    Plugin,
    Middleware,
    Layout,
    Store,
    Utility,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::Component,
        DocumentKind::Composable,
        DocumentKind::Plugin,
        DocumentKind::Middleware,
        DocumentKind::Layout,
        DocumentKind::Store,
        DocumentKind::Utility,
    ];

    /// Directory basenames that hold documents of this kind.
    pub fn dir_names(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Component => &["components"],
            DocumentKind::Composable => &["composables"],
            DocumentKind::Plugin => &["plugins"],
            DocumentKind::Middleware => &["middleware"],
            DocumentKind::Layout => &["layouts"],
            DocumentKind::Store => &["stores", "store"],
            DocumentKind::Utility => &["utils"],
        }
    }

    /// File extensions that define symbols of this kind.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Component | DocumentKind::Layout => COMPONENT_EXTENSIONS,
            _ => SCRIPT_EXTENSIONS,
        }
    }

    /// Whether a file with this extension could hold a usage of this kind.
    ///
    /// Drives per-kind cache invalidation: component references only live
    /// in `.vue` files, everything else can be referenced from any script or
    /// component file (layouts and middleware also from the config file).
    pub fn usage_extension(self, ext: &str) -> bool {
        match self {
            DocumentKind::Component => COMPONENT_EXTENSIONS.contains(&ext),
            _ => COMPONENT_EXTENSIONS.contains(&ext) || SCRIPT_EXTENSIONS.contains(&ext),
        }
    }

    /// Lens label prefix.
    pub fn icon(self) -> &'static str {
        match self {
            DocumentKind::Component => "🧩",
            DocumentKind::Composable => "🪝",
            DocumentKind::Plugin => "🔌",
            DocumentKind::Middleware => "🛡️",
            DocumentKind::Layout => "📐",
            DocumentKind::Store => "🗃️",
            DocumentKind::Utility => "🔧",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Component => "component",
            DocumentKind::Composable => "composable",
            DocumentKind::Plugin => "plugin",
            DocumentKind::Middleware => "middleware",
            DocumentKind::Layout => "layout",
            DocumentKind::Store => "store",
            DocumentKind::Utility => "utility",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LensError::UnknownKind(s.to_string()))
    }
}

/// Whether `path` is a root shell file (`app.vue`, `error.vue`).
pub fn is_shell_file(path: &Path, root: &Path) -> bool {
    let Ok(rel) = path.strip_prefix(root) else {
        return false;
    };
    rel.components().count() == 1
        && rel
            .to_str()
            .map(|name| SHELL_FILES.contains(&name))
            .unwrap_or(false)
}

/// Whether `path` is a `*.global.*` middleware file.
pub fn is_global_middleware(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.split('.').any(|part| part == "global"))
        .unwrap_or(false)
}

/// Classify a document by its root-relative directories and extension.
///
/// Exclusivity rules:
/// - root shell files have no kinds
/// - a file under both `pages` and `components` is a component
/// - a utility that is also a store is only a store
pub fn classify(path: &Path, root: &Path) -> Vec<DocumentKind> {
    if is_shell_file(path, root) {
        return Vec::new();
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let segments = relative_dir_segments(path, root);
    let under = |names: &[&str]| segments.iter().any(|s| names.contains(&s.as_str()));

    let mut kinds: Vec<DocumentKind> = DocumentKind::ALL
        .into_iter()
        .filter(|kind| kind.extensions().contains(&ext) && under(kind.dir_names()))
        .collect();

    if under(&["pages"]) && !kinds.contains(&DocumentKind::Component) {
        // Pages are consumers only.
        return Vec::new();
    }
    if kinds.contains(&DocumentKind::Store) {
        kinds.retain(|k| *k != DocumentKind::Utility);
    }

    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(rel: &str) -> Vec<DocumentKind> {
        let root = Path::new("/proj");
        classify(&root.join(rel), root)
    }

    #[test]
    fn test_basic_classification() {
        assert_eq!(kinds("components/Foo.vue"), vec![DocumentKind::Component]);
        assert_eq!(kinds("composables/useFoo.ts"), vec![DocumentKind::Composable]);
        assert_eq!(kinds("plugins/auth.client.ts"), vec![DocumentKind::Plugin]);
        assert_eq!(kinds("middleware/auth.ts"), vec![DocumentKind::Middleware]);
        assert_eq!(kinds("layouts/default.vue"), vec![DocumentKind::Layout]);
        assert_eq!(kinds("stores/cart.ts"), vec![DocumentKind::Store]);
        assert_eq!(kinds("store/cart.js"), vec![DocumentKind::Store]);
        assert_eq!(kinds("utils/format.ts"), vec![DocumentKind::Utility]);
    }

    #[test]
    fn test_extension_must_match_kind() {
        assert!(kinds("components/helpers.ts").is_empty());
        assert!(kinds("composables/Widget.vue").is_empty());
        assert!(kinds("pages/index.vue").is_empty());
    }

    #[test]
    fn test_shell_files_have_no_kinds() {
        assert!(kinds("app.vue").is_empty());
        assert!(kinds("error.vue").is_empty());
        assert_eq!(kinds("components/app.vue"), vec![DocumentKind::Component]);
    }

    #[test]
    fn test_pages_components_are_components() {
        assert_eq!(kinds("pages/components/Hero.vue"), vec![DocumentKind::Component]);
    }

    #[test]
    fn test_store_wins_over_utility() {
        assert_eq!(kinds("utils/stores/cart.ts"), vec![DocumentKind::Store]);
    }

    #[test]
    fn test_nested_layer_directories() {
        assert_eq!(
            kinds("layers/base/composables/useBar.ts"),
            vec![DocumentKind::Composable]
        );
    }

    #[test]
    fn test_global_middleware_detection() {
        assert!(is_global_middleware(Path::new("middleware/log.global.ts")));
        assert!(!is_global_middleware(Path::new("middleware/auth.ts")));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Store".parse::<DocumentKind>().unwrap(), DocumentKind::Store);
        assert!("page".parse::<DocumentKind>().is_err());
    }
}
