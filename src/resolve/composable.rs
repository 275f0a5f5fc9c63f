//! Composable and utility references.
//!
//! The host's native provider answers first. When it finds fewer than
//! `seed_threshold` references, or always for utilities, the project text
//! is searched too. Utilities additionally count verified imports, type
//! positions and template bindings.

use std::path::Path;

use crate::index::SkipReason;
use crate::io::for_each_batched;
use crate::kind::DocumentKind;
use crate::patterns::{call_usages, import_statements, type_usages, word_occurrences};
use crate::resolve::imports::import_reaches;
use crate::resolve::{ReferenceLocation, ResolveContext, SymbolQuery};
use crate::seed::seed_or_empty;
use crate::text::{preceding_char, preceding_word, DocumentLayout, LineIndex, Region};

/// Keywords that make a `name(` match a declaration rather than a call.
const DECLARATION_KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "class", "interface", "type", "enum",
];

/// Whether a call-like match at `offset` is a real usage.
fn is_call_usage(text: &str, offset: usize, layout: &DocumentLayout) -> bool {
    if preceding_char(text, offset) == Some('.') {
        return false;
    }
    if let Some(word) = preceding_word(text, offset) {
        if DECLARATION_KEYWORDS.contains(&word) {
            return false;
        }
    }
    layout.region_at(text, offset).is_expression()
}

/// Seed results that survive filtering: nothing under dependency/output
/// directories and not the declaration itself.
fn filtered_seed(query: &SymbolQuery, ctx: &ResolveContext<'_>) -> Vec<ReferenceLocation> {
    let (Some(path), Some((line, col))) = (query.defining_path.as_deref(), query.anchor) else {
        return Vec::new();
    };
    seed_or_empty(ctx.seed, path, line, col)
        .into_iter()
        .filter(|loc| {
            let rel = loc.file_path.strip_prefix(ctx.root).unwrap_or(&loc.file_path);
            ctx.ignore.path_reason(rel) != Some(SkipReason::IgnoredInternal)
        })
        .filter(|loc| !(loc.file_path == path && loc.start_line == line))
        .collect()
}

/// Utility-only matches in one file: verified imports, type positions and
/// template bindings.
fn utility_usages(
    query: &SymbolQuery,
    ctx: &ResolveContext<'_>,
    path: &Path,
    text: &str,
    layout: &DocumentLayout,
) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();

    if let Some(defining) = query.defining_path.as_deref() {
        for import in import_statements(text) {
            if !import_reaches(path, &import.source, ctx.root, defining, query.auto_imported) {
                continue;
            }
            if let Some(range) = import.named_range(text, &query.name) {
                ranges.push(range);
            }
        }
    }

    for range in type_usages(text, &query.name) {
        if layout.region_at(text, range.start) == Region::Code {
            ranges.push(range);
        }
    }

    for offset in word_occurrences(text, &query.name) {
        if matches!(
            layout.region_at(text, offset),
            Region::TemplateBinding | Region::TemplateInterpolation
        ) && preceding_char(text, offset) != Some('.')
        {
            ranges.push(offset..offset + query.name.len());
        }
    }

    ranges
}

pub async fn resolve_composable(
    query: &SymbolQuery,
    ctx: &ResolveContext<'_>,
) -> Vec<ReferenceLocation> {
    let mut locations = filtered_seed(query, ctx);
    let is_utility = query.kind == DocumentKind::Utility;
    if !is_utility && locations.len() >= ctx.config.seed_threshold {
        return locations;
    }

    let candidates = ctx.code_candidates(query.kind).await;
    for_each_batched(&candidates, ctx.batch_size(), |file| {
        if !file.text.contains(query.name.as_str()) {
            return;
        }
        let layout = DocumentLayout::for_path(&file.text, &file.path);
        let lines = LineIndex::new(&file.text);

        let mut ranges: Vec<_> = call_usages(&file.text, &query.name)
            .into_iter()
            .filter(|range| is_call_usage(&file.text, range.start, &layout))
            .collect();
        if is_utility {
            ranges.extend(utility_usages(query, ctx, &file.path, &file.text, &layout));
        }

        for range in ranges {
            locations.push(ReferenceLocation::from_range(&file.path, &lines, range));
        }
    })
    .await;

    locations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_call_usage() {
        let text = "export function useFoo() {}\nconst a = useFoo()\nobj.useFoo()\nconst s = 'useFoo()'";
        let layout = DocumentLayout::new(text, false);
        let offsets: Vec<usize> = call_usages(text, "useFoo").into_iter().map(|r| r.start).collect();
        let usage: Vec<bool> = offsets
            .iter()
            .map(|&o| is_call_usage(text, o, &layout))
            .collect();
        assert_eq!(usage, vec![false, true, false, false]);
    }
}
