//! Layout references.

use crate::io::for_each_batched;
use crate::kind::{is_shell_file, DocumentKind};
use crate::patterns::{layout_values, nuxt_layout_tags, set_page_layout_calls};
use crate::resolve::middleware::config_hook_references;
use crate::resolve::{ReferenceLocation, ResolveContext, SymbolQuery};
use crate::text::LineIndex;

/// Layout applied when a page names none.
pub const DEFAULT_LAYOUT: &str = "default";

/// Find `layout: 'name'` fields, `setPageLayout('name')` calls and
/// `<NuxtLayout name="name">` tags in component files, plus config route
/// hooks. Unnamed `<NuxtLayout>` tags in the root `app.vue` use the default
/// layout; without one, layouts are not rendered at all.
pub async fn resolve_layout(query: &SymbolQuery, ctx: &ResolveContext<'_>) -> Vec<ReferenceLocation> {
    let name = query.name.as_str();
    let candidates: Vec<_> = ctx
        .component_candidates(DocumentKind::Layout)
        .await
        .into_iter()
        .filter(|path| !query.is_defining_file(path))
        .collect();

    let mut locations = Vec::new();
    for_each_batched(&candidates, ctx.batch_size(), |file| {
        let text = file.text.as_str();
        let lines = LineIndex::new(text);
        let mut ranges = Vec::new();

        ranges.extend(
            layout_values(text, 0..text.len())
                .into_iter()
                .chain(set_page_layout_calls(text))
                .filter(|value| value.value == name)
                .map(|value| value.range),
        );

        let tags = nuxt_layout_tags(text);
        ranges.extend(
            tags.iter()
                .filter(|(_, tag_name)| tag_name.as_deref() == Some(name))
                .map(|(range, _)| range.clone()),
        );

        if name == DEFAULT_LAYOUT && is_shell_file(&file.path, ctx.root) && file.path.ends_with("app.vue") {
            ranges.extend(
                tags.iter()
                    .filter(|(_, tag_name)| tag_name.is_none())
                    .map(|(range, _)| range.clone()),
            );
        }

        for range in ranges {
            locations.push(ReferenceLocation::from_range(&file.path, &lines, range));
        }
    })
    .await;

    locations.extend(config_hook_references(ctx, name, layout_values).await);
    locations
}
