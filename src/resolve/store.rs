//! Store references.
//!
//! Pass one finds the files defining the store (excluded from results) and
//! any local binding the definition is assigned to. Pass two searches every
//! other file for the hook name, `useStore('id')` and those bindings.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::io::for_each_batched;
use crate::kind::DocumentKind;
use crate::naming::{hook_name_variants, store_id_variants};
use crate::patterns::{call_usages, store_definitions, use_store_calls};
use crate::resolve::{ReferenceLocation, ResolveContext, SymbolQuery};
use crate::text::{preceding_char, preceding_word, DocumentLayout, LineIndex};

/// Definition files of the store and the names it can be called by.
#[derive(Debug, Default)]
struct StoreTargets {
    defining: HashSet<PathBuf>,
    names: Vec<String>,
}

async fn find_definitions(
    ids: &[String],
    candidates: &[PathBuf],
    ctx: &ResolveContext<'_>,
) -> StoreTargets {
    let mut targets = StoreTargets::default();
    for_each_batched(candidates, ctx.batch_size(), |file| {
        if !file.text.contains("defineStore") {
            return;
        }
        for def in store_definitions(&file.text) {
            if !ids.contains(&def.id) {
                continue;
            }
            targets.defining.insert(file.path.clone());
            if let Some(binding) = def.binding {
                if !targets.names.contains(&binding) {
                    targets.names.push(binding);
                }
            }
        }
    })
    .await;
    targets
}

pub async fn resolve_store(query: &SymbolQuery, ctx: &ResolveContext<'_>) -> Vec<ReferenceLocation> {
    let ids = store_id_variants(&query.name);
    let candidates = ctx.code_candidates(DocumentKind::Store).await;

    let mut targets = find_definitions(&ids, &candidates, ctx).await;
    if let Some(path) = &query.defining_path {
        targets.defining.insert(path.clone());
    }
    for hook in hook_name_variants(&query.name) {
        if !targets.names.contains(&hook) {
            targets.names.push(hook);
        }
    }

    let remaining: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|path| !targets.defining.contains(path))
        .collect();

    let mut locations = Vec::new();
    for_each_batched(&remaining, ctx.batch_size(), |file| {
        let layout = DocumentLayout::for_path(&file.text, &file.path);
        let lines = LineIndex::new(&file.text);

        for name in &targets.names {
            if !file.text.contains(name.as_str()) {
                continue;
            }
            for range in call_usages(&file.text, name) {
                let offset = range.start;
                if preceding_char(&file.text, offset) == Some('.')
                    || preceding_word(&file.text, offset) == Some("function")
                    || !layout.region_at(&file.text, offset).is_expression()
                {
                    continue;
                }
                locations.push(ReferenceLocation::from_range(&file.path, &lines, range));
            }
        }

        for (id, range) in use_store_calls(&file.text) {
            if ids.contains(&id) && layout.region_at(&file.text, range.start).is_expression() {
                locations.push(ReferenceLocation::from_range(&file.path, &lines, range));
            }
        }
    })
    .await;

    locations
}
