//! Plugin references.
//!
//! A plugin is used through what it provides (`$key` properties on the app
//! instance), through the directives it registers, or by importing its file
//! directly.

use std::path::{Path, PathBuf};

use crate::io::{for_each_batched, read_text};
use crate::kind::DocumentKind;
use crate::naming::pascal_to_kebab;
use crate::patterns::{
    app_property_usages, bare_imports, destructured_app_keys, directive_names, directive_usages,
    import_statements, provide_call_keys, provide_object_keys, word_occurrences,
};
use crate::resolve::imports::import_reaches;
use crate::resolve::{ReferenceLocation, ResolveContext, SymbolQuery};
use crate::text::{preceding_char, DocumentLayout, LineIndex, Region};

/// What a plugin file registers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginExports {
    /// Provided keys, without the `$` prefix
    pub provided: Vec<String>,
    pub directives: Vec<String>,
}

impl PluginExports {
    pub fn parse(text: &str) -> Self {
        let mut provided = provide_call_keys(text);
        for key in provide_object_keys(text) {
            if !provided.contains(&key) {
                provided.push(key);
            }
        }
        let mut directives = directive_names(text);
        directives.dedup();
        Self {
            provided,
            directives,
        }
    }
}

/// Conventional location of a plugin: `plugins/<name>[.client|.server].{ts,js}`.
pub fn conventional_plugin_path(root: &Path, name: &str) -> Option<PathBuf> {
    let plugins = &root.join("plugins");
    ["", ".client", ".server"]
        .iter()
        .flat_map(|suffix| {
            ["ts", "js"]
                .iter()
                .map(move |ext| plugins.join(format!("{}{}.{}", name, suffix, ext)))
        })
        .find(|path| path.is_file())
}

/// Directive attribute spellings: as registered and kebab-cased.
fn directive_spellings(name: &str) -> Vec<String> {
    let mut spellings = vec![name.to_string()];
    let kebab = pascal_to_kebab(name);
    if kebab != name {
        spellings.push(kebab);
    }
    spellings
}

pub async fn resolve_plugin(query: &SymbolQuery, ctx: &ResolveContext<'_>) -> Vec<ReferenceLocation> {
    let Some(defining) = query
        .defining_path
        .clone()
        .or_else(|| conventional_plugin_path(ctx.root, &query.name))
    else {
        log::debug!("No plugin file found for '{}'", query.name);
        return Vec::new();
    };

    let exports = match read_text(&defining).await {
        Some(text) => PluginExports::parse(&text),
        None => PluginExports::default(),
    };
    let directives: Vec<String> = exports
        .directives
        .iter()
        .flat_map(|d| directive_spellings(d))
        .collect();

    let candidates: Vec<PathBuf> = ctx
        .code_candidates(DocumentKind::Plugin)
        .await
        .into_iter()
        .filter(|path| *path != defining)
        .collect();

    let mut locations = Vec::new();
    for_each_batched(&candidates, ctx.batch_size(), |file| {
        let text = file.text.as_str();
        let layout = DocumentLayout::for_path(text, &file.path);
        let lines = LineIndex::new(text);
        let mut ranges = Vec::new();

        for key in &exports.provided {
            let property = format!("${}", key);
            if !text.contains(property.as_str()) {
                continue;
            }
            ranges.extend(
                app_property_usages(text, key)
                    .into_iter()
                    .filter(|r| layout.region_at(text, r.start).is_expression()),
            );
            ranges.extend(
                destructured_app_keys(text)
                    .into_iter()
                    .filter(|(name, _)| name == key)
                    .map(|(_, range)| range),
            );
            for offset in word_occurrences(text, &property) {
                let in_template = matches!(
                    layout.region_at(text, offset),
                    Region::TemplateBinding | Region::TemplateInterpolation
                );
                if in_template && preceding_char(text, offset) != Some('.') {
                    ranges.push(offset..offset + property.len());
                }
            }
        }

        for directive in &directives {
            ranges.extend(
                directive_usages(text, directive)
                    .into_iter()
                    .filter(|r| layout.region_at(text, r.start) == Region::TemplateTag),
            );
        }

        for import in import_statements(text) {
            if import_reaches(&file.path, &import.source, ctx.root, &defining, false) {
                ranges.push(import.range);
            }
        }
        for (source, range) in bare_imports(text) {
            if import_reaches(&file.path, &source, ctx.root, &defining, false) {
                ranges.push(range);
            }
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
    fn test_plugin_exports_parse() {
        let text = "export default defineNuxtPlugin((nuxtApp) => {\n  nuxtApp.provide('toast', show)\n  nuxtApp.vueApp.directive('clickOutside', {})\n  return { provide: { toast: show, api } }\n})";
        let exports = PluginExports::parse(text);
        assert_eq!(exports.provided, vec!["toast", "api"]);
        assert_eq!(exports.directives, vec!["clickOutside"]);
        assert_eq!(directive_spellings("clickOutside"), vec!["clickOutside", "click-outside"]);
    }

    #[test]
    fn test_conventional_plugin_path_tries_mode_suffixes() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("plugins")).unwrap();
        std::fs::write(root.join("plugins/auth.client.js"), "export default {}").unwrap();
        std::fs::write(root.join("plugins/api.ts"), "export default {}").unwrap();

        assert_eq!(
            conventional_plugin_path(root, "auth"),
            Some(root.join("plugins/auth.client.js"))
        );
        assert_eq!(conventional_plugin_path(root, "api"), Some(root.join("plugins/api.ts")));
        assert_eq!(conventional_plugin_path(root, "missing"), None);
    }
}
