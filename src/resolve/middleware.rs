//! Route middleware references: page metadata and config route hooks.

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::io::{for_each_batched, read_all};
use crate::kind::DocumentKind;
use crate::patterns::{middleware_values, page_meta_blocks, pages_extend_blocks, FieldValue};
use crate::paths::relative_dir_segments;
use crate::project::CONFIG_FILE_NAMES;
use crate::resolve::{ReferenceLocation, ResolveContext, SymbolQuery};
use crate::text::LineIndex;

/// Whether `path` lives under a `pages` directory.
pub fn is_page_file(path: &Path, root: &Path) -> bool {
    relative_dir_segments(path, root).iter().any(|s| s == "pages")
}

/// Framework config files at the project root.
pub fn config_files(root: &Path) -> Vec<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .filter(|path| path.is_file())
        .collect()
}

/// References from `'pages:extend'` hooks in the config files, using
/// `values` to pull candidate names out of each hook body.
pub async fn config_hook_references<F>(
    ctx: &ResolveContext<'_>,
    name: &str,
    values: F,
) -> Vec<ReferenceLocation>
where
    F: Fn(&str, Range<usize>) -> Vec<FieldValue>,
{
    let mut locations = Vec::new();
    for file in read_all(&config_files(ctx.root), ctx.batch_size()).await {
        let lines = LineIndex::new(&file.text);
        for block in pages_extend_blocks(&file.text) {
            for value in values(&file.text, block) {
                if value.value == name {
                    locations.push(ReferenceLocation::from_range(&file.path, &lines, value.range));
                }
            }
        }
    }
    locations
}

pub async fn resolve_middleware(
    query: &SymbolQuery,
    ctx: &ResolveContext<'_>,
) -> Vec<ReferenceLocation> {
    let pages: Vec<PathBuf> = ctx
        .component_candidates(DocumentKind::Middleware)
        .await
        .into_iter()
        .filter(|path| is_page_file(path, ctx.root))
        .collect();

    let mut locations = Vec::new();
    for_each_batched(&pages, ctx.batch_size(), |file| {
        if !file.text.contains("definePageMeta") {
            return;
        }
        let lines = LineIndex::new(&file.text);
        for block in page_meta_blocks(&file.text) {
            for value in middleware_values(&file.text, block) {
                if value.value == query.name {
                    locations.push(ReferenceLocation::from_range(&file.path, &lines, value.range));
                }
            }
        }
    })
    .await;

    locations.extend(config_hook_references(ctx, &query.name, middleware_values).await);
    locations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_page_file() {
        let root = Path::new("/p");
        assert!(is_page_file(Path::new("/p/pages/admin/index.vue"), root));
        assert!(!is_page_file(Path::new("/p/components/Page.vue"), root));
    }
}
