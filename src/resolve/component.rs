//! Component tag references.

use crate::io::for_each_batched;
use crate::kind::{is_shell_file, DocumentKind};
use crate::naming::pascal_to_kebab;
use crate::patterns::component_tags;
use crate::resolve::{ReferenceLocation, ResolveContext, SymbolQuery};
use crate::text::{DocumentLayout, LineIndex};

/// Tag names a component can be used under: PascalCase, kebab-case and
/// their `Lazy` forms.
pub fn tag_names(component: &str) -> Vec<String> {
    let kebab = pascal_to_kebab(component);
    let mut names = vec![
        component.to_string(),
        kebab.clone(),
        format!("Lazy{}", component),
        format!("lazy-{}", kebab),
    ];
    names.dedup();
    names
}

/// Find opening tags of `query.name` in every component file except root
/// shell files and the component's own file. Each location spans the whole
/// tag, possibly across lines.
pub async fn resolve_component(
    query: &SymbolQuery,
    ctx: &ResolveContext<'_>,
) -> Vec<ReferenceLocation> {
    let names = tag_names(&query.name);
    let candidates: Vec<_> = ctx
        .component_candidates(DocumentKind::Component)
        .await
        .into_iter()
        .filter(|path| !is_shell_file(path, ctx.root) && !query.is_defining_file(path))
        .collect();

    let mut locations = Vec::new();
    for_each_batched(&candidates, ctx.batch_size(), |file| {
        let layout = DocumentLayout::new(&file.text, true);
        let mut lines: Option<LineIndex> = None;
        for range in component_tags(&file.text, &names) {
            if layout.template().is_some() && !layout.in_template(range.start) {
                continue;
            }
            let lines = lines.get_or_insert_with(|| LineIndex::new(&file.text));
            locations.push(ReferenceLocation::from_range(&file.path, lines, range));
        }
    })
    .await;
    locations
}
