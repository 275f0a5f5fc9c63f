//! Recognised source patterns.
//!
//! Analysis is syntactic: each framework construct the engine understands is
//! one named function here, so patterns can be tested without file I/O.
//! Offsets are byte offsets into the text that was passed in.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use crate::scan::DeclarationKind;
use crate::text::{balanced_block, is_identifier_continuation};

static EXPORT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)\bexport\s+(?:default\s+)?(async\s+function\*?|function\*?|const|let|var|interface|type|enum|class)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("valid regex")
});

static DEFINE_STORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*)?\bdefineStore\s*\(\s*['"`]([^'"`]+)['"`]"#,
    )
    .expect("valid regex")
});

static DEFINE_STORE_OPTIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*)?\bdefineStore\s*\(\s*\{[^}]*?\bid\s*:\s*['"`]([^'"`]+)['"`]"#,
    )
    .expect("valid regex")
});

static USE_STORE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\buseStore\s*\(\s*['"`]([^'"`]+)['"`]"#).expect("valid regex")
});

static SCRIPT_SETUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<script\b[^>]*\bsetup\b[^>]*>").expect("valid regex"));
static DEFINE_COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdefineComponent\s*\(").expect("valid regex"));
static SCRIPT_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<script\b").expect("valid regex"));
static TEMPLATE_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<template\b").expect("valid regex"));
static EXPORT_DEFAULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s+default\b").expect("valid regex"));
static DEFINE_PLUGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdefineNuxtPlugin\s*\(").expect("valid regex"));
static DEFINE_MIDDLEWARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdefineNuxtRouteMiddleware\s*\(").expect("valid regex"));

static PROVIDE_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bprovide\s*\(\s*['"`]([^'"`]+)['"`]"#).expect("valid regex")
});
static PROVIDE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprovide\s*:\s*\{").expect("valid regex"));
static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\.directive\s*\(\s*['"`]([^'"`]+)['"`]"#).expect("valid regex")
});
static OBJECT_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:async\s+)?(?:get\s+|set\s+)?(?:['"]([^'"]+)['"]|([A-Za-z_$][\w$]*))"#)
        .expect("valid regex")
});

static PAGE_META_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdefinePageMeta\s*\(").expect("valid regex"));
static MIDDLEWARE_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bmiddleware\s*:\s*(?:['"`]([^'"`]+)['"`]|(\[[^\]]*\]))"#).expect("valid regex")
});
static STRING_LITERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"`]([^'"`]+)['"`]"#).expect("valid regex"));
static LAYOUT_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\blayout\s*:\s*['"`]([^'"`]+)['"`]"#).expect("valid regex")
});
static SET_PAGE_LAYOUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bsetPageLayout\s*\(\s*['"`]([^'"`]+)['"`]"#).expect("valid regex")
});
static NUXT_LAYOUT_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(?:NuxtLayout|nuxt-layout)\b[^>]*>").expect("valid regex"));
static NAME_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)name\s*=\s*['"]([^'"]+)['"]"#).expect("valid regex"));
static PAGES_EXTEND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]pages:extend['"]"#).expect("valid regex"));

static IMPORT_FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s+(type\s+)?([^;'"]*?)\s*\bfrom\s*['"]([^'"]+)['"]"#).expect("valid regex")
});
static DYNAMIC_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"`]([^'"`]+)['"`]\s*\)"#).expect("valid regex")
});
static DESTRUCTURED_APP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^}]*)\}\s*=\s*useNuxtApp\s*\(\s*\)").expect("valid regex")
});
static DOLLAR_IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[A-Za-z_][\w$]*").expect("valid regex"));
static SIDE_EFFECT_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s+['"]([^'"]+)['"]"#).expect("valid regex"));

/// One `export <kind> <name>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDeclaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// Offset of the `export` keyword
    pub offset: usize,
    /// Range of the declared name
    pub name_range: Range<usize>,
}

/// Every exported declaration in `text`.
pub fn export_declarations(text: &str) -> Vec<ExportDeclaration> {
    EXPORT_DECL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let keyword = caps.get(1)?.as_str();
            let name = caps.get(2)?;
            Some(ExportDeclaration {
                name: name.as_str().to_string(),
                kind: DeclarationKind::from_keyword(keyword)?,
                offset: whole.start(),
                name_range: name.range(),
            })
        })
        .collect()
}

/// One store definition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDefinition {
    /// The store id string literal
    pub id: String,
    /// Local binding assigned the call result, if any
    pub binding: Option<String>,
    /// Start of the statement (binding keyword or the call)
    pub offset: usize,
}

/// Every `defineStore('id', ...)` and `defineStore({ id: 'id' })` call.
pub fn store_definitions(text: &str) -> Vec<StoreDefinition> {
    let mut defs: Vec<StoreDefinition> = DEFINE_STORE_RE
        .captures_iter(text)
        .chain(DEFINE_STORE_OPTIONS_RE.captures_iter(text))
        .filter_map(|caps| {
            Some(StoreDefinition {
                id: caps.get(2)?.as_str().to_string(),
                binding: caps.get(1).map(|m| m.as_str().to_string()),
                offset: caps.get(0)?.start(),
            })
        })
        .collect();
    defs.sort_by_key(|d| d.offset);
    defs.dedup_by_key(|d| d.offset);
    defs
}

/// Whether `text` defines any store.
pub fn defines_store(text: &str) -> bool {
    text.contains("defineStore") && !store_definitions(text).is_empty()
}

/// `useStore('id')` calls: `(id, range of the call name)`.
pub fn use_store_calls(text: &str) -> Vec<(String, Range<usize>)> {
    USE_STORE_ID_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((
                caps.get(1)?.as_str().to_string(),
                whole.start()..whole.start() + "useStore".len(),
            ))
        })
        .collect()
}

/// Anchor of a single-file component: `<script setup>`, then
/// `defineComponent(`, then any `<script>`, then `<template>`.
pub fn component_anchor(text: &str) -> Option<usize> {
    [&*SCRIPT_SETUP_RE, &*DEFINE_COMPONENT_RE, &*SCRIPT_TAG_RE, &*TEMPLATE_TAG_RE]
        .iter()
        .find_map(|re| re.find(text).map(|m| m.start()))
}

/// Anchor of a plugin file: `defineNuxtPlugin(` or `export default`.
pub fn plugin_anchor(text: &str) -> Option<usize> {
    DEFINE_PLUGIN_RE
        .find(text)
        .or_else(|| EXPORT_DEFAULT_RE.find(text))
        .map(|m| m.start())
}

/// Anchor of a route middleware file: `defineNuxtRouteMiddleware(` or
/// `export default`.
pub fn middleware_anchor(text: &str) -> Option<usize> {
    DEFINE_MIDDLEWARE_RE
        .find(text)
        .or_else(|| EXPORT_DEFAULT_RE.find(text))
        .map(|m| m.start())
}

/// Anchor of a layout file: its `<template>` tag.
pub fn layout_anchor(text: &str) -> Option<usize> {
    TEMPLATE_TAG_RE.find(text).map(|m| m.start())
}

/// Keys registered with `provide('key', ...)`.
pub fn provide_call_keys(text: &str) -> Vec<String> {
    PROVIDE_CALL_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Keys of every `provide: { ... }` object literal, including shorthand and
/// method keys.
pub fn provide_object_keys(text: &str) -> Vec<String> {
    PROVIDE_BLOCK_RE
        .find_iter(text)
        .filter_map(|m| balanced_block(text, m.end() - 1))
        .flat_map(|block| object_keys(&text[block.start + 1..block.end - 1]))
        .collect()
}

/// Top-level keys of an object literal body.
pub fn object_keys(body: &str) -> Vec<String> {
    split_top_level(body, b',')
        .into_iter()
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() || entry.starts_with("...") {
                return None;
            }
            let caps = OBJECT_KEY_RE.captures(entry)?;
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Split `body` on `separator` at nesting depth zero, skipping strings.
fn split_top_level(body: &str, separator: u8) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
            }
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < body.len() {
        parts.push(&body[start..]);
    }
    parts
}

/// Directive names registered with `.directive('name', ...)`.
pub fn directive_names(text: &str) -> Vec<String> {
    DIRECTIVE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Argument ranges of every `definePageMeta(...)` call, parentheses
/// included.
pub fn page_meta_blocks(text: &str) -> Vec<Range<usize>> {
    PAGE_META_RE
        .find_iter(text)
        .filter_map(|m| balanced_block(text, m.end() - 1))
        .collect()
}

/// Body ranges of every `'pages:extend'` hook, braces included.
///
/// Covers the method (`'pages:extend'(pages) {}`), property
/// (`'pages:extend': (pages) => {}`) and `hook('pages:extend', ...)` forms.
pub fn pages_extend_blocks(text: &str) -> Vec<Range<usize>> {
    PAGES_EXTEND_RE
        .find_iter(text)
        .filter_map(|m| {
            let brace = text[m.end()..].find('{').map(|i| m.end() + i)?;
            balanced_block(text, brace)
        })
        .collect()
}

/// A string value found in a recognised field, with the literal's range
/// (quotes included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub value: String,
    pub range: Range<usize>,
}

fn literals_in(text: &str, base: usize) -> impl Iterator<Item = FieldValue> + '_ {
    STRING_LITERAL_RE.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        Some(FieldValue {
            value: caps.get(1)?.as_str().to_string(),
            range: base + whole.start()..base + whole.end(),
        })
    })
}

/// `middleware: 'name'` and `middleware: ['a', 'b']` values inside
/// `text[range]`.
pub fn middleware_values(text: &str, range: Range<usize>) -> Vec<FieldValue> {
    let base = range.start;
    let scope = &text[range];
    let mut values = Vec::new();
    for caps in MIDDLEWARE_FIELD_RE.captures_iter(scope) {
        if let Some(single) = caps.get(1) {
            values.push(FieldValue {
                value: single.as_str().to_string(),
                range: base + single.start() - 1..base + single.end() + 1,
            });
        } else if let Some(array) = caps.get(2) {
            values.extend(literals_in(array.as_str(), base + array.start()));
        }
    }
    values
}

/// `layout: 'name'` values inside `text[range]`.
pub fn layout_values(text: &str, range: Range<usize>) -> Vec<FieldValue> {
    let base = range.start;
    LAYOUT_FIELD_RE
        .captures_iter(&text[range])
        .filter_map(|caps| {
            let value = caps.get(1)?;
            Some(FieldValue {
                value: value.as_str().to_string(),
                range: base + value.start() - 1..base + value.end() + 1,
            })
        })
        .collect()
}

/// `setPageLayout('name')` calls.
pub fn set_page_layout_calls(text: &str) -> Vec<FieldValue> {
    SET_PAGE_LAYOUT_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(FieldValue {
                value: caps.get(1)?.as_str().to_string(),
                range: whole.start()..whole.end() + 1,
            })
        })
        .collect()
}

/// Opening `<NuxtLayout ...>` tags: full tag range plus its static `name`
/// attribute, if any.
pub fn nuxt_layout_tags(text: &str) -> Vec<(Range<usize>, Option<String>)> {
    NUXT_LAYOUT_TAG_RE
        .find_iter(text)
        .map(|m| {
            let name = NAME_ATTR_RE
                .captures(m.as_str())
                .and_then(|caps| caps.get(1))
                .map(|n| n.as_str().to_string());
            (m.range(), name)
        })
        .collect()
}

/// One static import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// `(imported, local)` named specifiers
    pub named: Vec<(String, String)>,
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub source: String,
    pub type_only: bool,
    pub range: Range<usize>,
}

impl ImportStatement {
    /// Range of the named specifier importing `name`, if present.
    pub fn named_range(&self, text: &str, name: &str) -> Option<Range<usize>> {
        if !self.named.iter().any(|(imported, _)| imported == name) {
            return None;
        }
        let stmt = &text[self.range.clone()];
        find_word(stmt, name).map(|start| self.range.start + start..self.range.start + start + name.len())
    }
}

/// Every `import ... from '...'` statement.
pub fn import_statements(text: &str) -> Vec<ImportStatement> {
    IMPORT_FROM_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let clause = caps.get(2)?.as_str().trim();
            let (default, named, namespace) = parse_import_clause(clause);
            Some(ImportStatement {
                named,
                default,
                namespace,
                source: caps.get(3)?.as_str().to_string(),
                type_only: caps.get(1).is_some(),
                range: whole.range(),
            })
        })
        .collect()
}

fn parse_import_clause(clause: &str) -> (Option<String>, Vec<(String, String)>, Option<String>) {
    let mut default = None;
    let mut named = Vec::new();
    let mut namespace = None;

    let (outside, inside) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{} {}", &clause[..open], &clause[close + 1..]),
            Some(&clause[open + 1..close]),
        ),
        _ => (clause.to_string(), None),
    };

    if let Some(inside) = inside {
        for spec in inside.split(',') {
            let spec = spec.trim().trim_start_matches("type ").trim();
            if spec.is_empty() {
                continue;
            }
            let mut parts = spec.split_whitespace();
            let imported = parts.next().unwrap_or_default().to_string();
            let local = match (parts.next(), parts.next()) {
                (Some("as"), Some(alias)) => alias.to_string(),
                _ => imported.clone(),
            };
            named.push((imported, local));
        }
    }

    for part in outside.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(ns) = part.strip_prefix('*') {
            namespace = ns.trim().strip_prefix("as").map(|n| n.trim().to_string());
        } else {
            default = Some(part.to_string());
        }
    }

    (default, named, namespace)
}

/// Sources of `import('...')` calls and side-effect imports, with the range
/// of the whole expression.
pub fn bare_imports(text: &str) -> Vec<(String, Range<usize>)> {
    DYNAMIC_IMPORT_RE
        .captures_iter(text)
        .chain(SIDE_EFFECT_IMPORT_RE.captures_iter(text))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((caps.get(1)?.as_str().to_string(), whole.range()))
        })
        .collect()
}

/// Offset of `word` in `text` as a whole identifier.
pub fn find_word(text: &str, word: &str) -> Option<usize> {
    word_occurrences(text, word).into_iter().next()
}

/// Every offset where `word` occurs as a whole identifier.
pub fn word_occurrences(text: &str, word: &str) -> Vec<usize> {
    if word.is_empty() {
        return Vec::new();
    }
    text.match_indices(word)
        .map(|(i, _)| i)
        .filter(|&i| {
            let end = i + word.len();
            !is_identifier_continuation(text, i)
                && !text[end..]
                    .chars()
                    .next()
                    .map(|c| c.is_alphanumeric() || c == '_' || c == '$')
                    .unwrap_or(false)
        })
        .collect()
}

/// Call-like usages `name(` or `name<`: ranges of the name.
pub fn call_usages(text: &str, name: &str) -> Vec<Range<usize>> {
    let Ok(re) = Regex::new(&format!(r"{}\s*[(<]", regex::escape(name))) else {
        return Vec::new();
    };
    re.find_iter(text)
        .map(|m| m.start())
        .filter(|&start| !is_identifier_continuation(text, start))
        .map(|start| start..start + name.len())
        .collect()
}

/// Type-position usages `: Name` and `<Name`: ranges of the name.
pub fn type_usages(text: &str, name: &str) -> Vec<Range<usize>> {
    let Ok(re) = Regex::new(&format!(r"(?:[:<]|\|)\s*({})", regex::escape(name))) else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|m| {
            !text[m.end()..]
                .chars()
                .next()
                .map(|c| c.is_alphanumeric() || c == '_' || c == '$')
                .unwrap_or(false)
        })
        .map(|m| m.range())
        .collect()
}

/// Accesses of a provided `$key` off the app instance: `useNuxtApp().$key`,
/// `nuxtApp.$key`, `app.$key`, `this.$key`, `.prototype.$key` and
/// `globalProperties.$key`. Ranges cover `$key`.
pub fn app_property_usages(text: &str, key: &str) -> Vec<Range<usize>> {
    let property = format!("${}", key);
    let Ok(re) = Regex::new(&format!(
        r"(?:useNuxtApp\s*\(\s*\)|\bnuxtApp|\bapp|\bthis|\.prototype|\bglobalProperties)\s*\.\s*({})",
        regex::escape(&property)
    )) else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !continues_identifier(text, m.end()))
        .map(|m| m.range())
        .collect()
}

/// `$key` names destructured from `useNuxtApp()`, with their ranges.
pub fn destructured_app_keys(text: &str) -> Vec<(String, Range<usize>)> {
    DESTRUCTURED_APP_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|group| {
            let body = group.as_str();
            let base = group.start();
            DOLLAR_IDENT_RE
                .find_iter(body)
                .map(move |m| (m.as_str()[1..].to_string(), base + m.start()..base + m.end()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// `v-<name>` directive attributes. Ranges cover the attribute name.
pub fn directive_usages(text: &str, name: &str) -> Vec<Range<usize>> {
    let attribute = format!("v-{}", name);
    text.match_indices(attribute.as_str())
        .map(|(i, _)| i..i + attribute.len())
        .filter(|range| {
            let before_ok = !text[..range.start]
                .chars()
                .next_back()
                .map(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ':')
                .unwrap_or(false);
            let after_ok = !text[range.end..]
                .chars()
                .next()
                .map(|c| c.is_alphanumeric() || c == '-' || c == '_')
                .unwrap_or(false);
            before_ok && after_ok
        })
        .collect()
}

fn continues_identifier(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .map(|c| c.is_alphanumeric() || c == '_' || c == '$')
        .unwrap_or(false)
}

/// Opening tags for any of `names`, tolerating attributes, self-closing and
/// multi-line tags. Ranges cover the whole tag.
pub fn component_tags(text: &str, names: &[String]) -> Vec<Range<usize>> {
    if names.is_empty() {
        return Vec::new();
    }
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(re) = Regex::new(&format!(
        r#"<(?:{})(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?/?>"#,
        alternation
    )) else {
        return Vec::new();
    };
    re.find_iter(text).map(|m| m.range()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_declarations() {
        let text = "export const a = 1\nexport async function useFoo() {}\nexport function* gen() {}\nexport interface Shape {}\nexport type Id = string\nexport enum Color { Red }\nexport class Box {}\nexport default function main() {}\nconst hidden = 1";
        let decls = export_declarations(text);
        let pairs: Vec<(&str, DeclarationKind)> =
            decls.iter().map(|d| (d.name.as_str(), d.kind)).collect();
        assert_eq!(
            pairs,
            vec![
                ("a", DeclarationKind::Const),
                ("useFoo", DeclarationKind::AsyncFunction),
                ("gen", DeclarationKind::Function),
                ("Shape", DeclarationKind::Interface),
                ("Id", DeclarationKind::Type),
                ("Color", DeclarationKind::Enum),
                ("Box", DeclarationKind::Class),
                ("main", DeclarationKind::Function),
            ]
        );
        assert_eq!(&text[decls[1].name_range.clone()], "useFoo");
    }

    #[test]
    fn test_store_definitions() {
        let text = "export const useCart = defineStore('cart', {})\ndefineStore(\"user-prefs\", () => {})\nexport const useLegacy = defineStore({ id: 'legacy', state: () => ({}) })";
        let defs = store_definitions(text);
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].id, "cart");
        assert_eq!(defs[0].binding.as_deref(), Some("useCart"));
        assert_eq!(defs[0].offset, 0);
        assert_eq!(defs[1].id, "user-prefs");
        assert_eq!(defs[1].binding, None);
        assert_eq!(defs[2].id, "legacy");
        assert!(defines_store(text));
        assert!(!defines_store("// defineStore is mentioned only"));
    }

    #[test]
    fn test_use_store_calls() {
        let text = "const s = useStore('cart')";
        let calls = use_store_calls(text);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "cart");
        assert_eq!(&text[calls[0].1.clone()], "useStore");
    }

    #[test]
    fn test_anchors() {
        let sfc = "<template><div/></template>\n<script setup lang=\"ts\">\n</script>";
        assert_eq!(component_anchor(sfc), sfc.find("<script"));
        let options = "<script>\nexport default defineComponent({})\n</script>";
        assert_eq!(component_anchor(options), options.find("defineComponent"));
        assert_eq!(component_anchor("<template><p/></template>"), Some(0));
        assert_eq!(component_anchor("plain text"), None);

        assert_eq!(plugin_anchor("export default defineNuxtPlugin(() => {})"), Some(15));
        assert_eq!(middleware_anchor("export default () => {}"), Some(0));
        assert_eq!(layout_anchor("<template><slot/></template>"), Some(0));
    }

    #[test]
    fn test_provide_keys_and_directives() {
        let text = r#"
export default defineNuxtPlugin((nuxtApp) => {
  nuxtApp.provide('hello', (n) => `Hello ${n}`)
  nuxtApp.vueApp.directive('focus', { mounted: (el) => el.focus() })
  const api = createApi()
  return {
    provide: {
      api,
      'quoted-key': 1,
      notify(msg) { console.log(msg) },
      async fetchAll() {},
      nested: { inner: 1 },
      ...extra,
    }
  }
})
"#;
        assert_eq!(provide_call_keys(text), vec!["hello"]);
        assert_eq!(directive_names(text), vec!["focus"]);
        assert_eq!(
            provide_object_keys(text),
            vec!["api", "quoted-key", "notify", "fetchAll", "nested"]
        );
    }

    #[test]
    fn test_middleware_values() {
        let text = "definePageMeta({ middleware: ['auth', \"admin\"] })\ndefinePageMeta({ middleware: 'guest' })";
        let blocks = page_meta_blocks(text);
        assert_eq!(blocks.len(), 2);

        let first = middleware_values(text, blocks[0].clone());
        let names: Vec<&str> = first.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(names, vec!["auth", "admin"]);
        assert_eq!(&text[first[0].range.clone()], "'auth'");

        let second = middleware_values(text, blocks[1].clone());
        assert_eq!(second[0].value, "guest");
        assert_eq!(&text[second[0].range.clone()], "'guest'");
    }

    #[test]
    fn test_pages_extend_blocks() {
        let text = r#"export default defineNuxtConfig({
  middleware: 'not-in-hook',
  hooks: {
    'pages:extend'(pages) {
      pages.push({ path: '/admin', meta: { middleware: ['admin'] } })
    }
  }
})"#;
        let blocks = pages_extend_blocks(text);
        assert_eq!(blocks.len(), 1);
        let values = middleware_values(text, blocks[0].clone());
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, "admin");

        let arrow = "nuxt.hook('pages:extend', (pages) => { pages.push({ layout: 'wide' }) })";
        let blocks = pages_extend_blocks(arrow);
        assert_eq!(layout_values(arrow, blocks[0].clone())[0].value, "wide");
    }

    #[test]
    fn test_layout_patterns() {
        let text = "<template><NuxtLayout name=\"admin\">x</NuxtLayout><NuxtLayout /></template>\n<script setup>\ndefinePageMeta({ layout: 'custom' })\nsetPageLayout('other')\n</script>";
        let values = layout_values(text, 0..text.len());
        assert_eq!(values[0].value, "custom");
        assert_eq!(&text[values[0].range.clone()], "'custom'");

        let calls = set_page_layout_calls(text);
        assert_eq!(calls[0].value, "other");
        assert_eq!(&text[calls[0].range.clone()], "setPageLayout('other')");

        let tags = nuxt_layout_tags(text);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].1.as_deref(), Some("admin"));
        assert_eq!(tags[1].1, None);
        assert_eq!(&text[tags[1].0.clone()], "<NuxtLayout />");
    }

    #[test]
    fn test_import_statements() {
        let text = "import Default, { format as fmt, parse } from '~/utils/format'\nimport * as all from './all'\nimport type { Shape } from '@/types'\nconst lazy = import('../plugins/auth')\nimport './side-effect'";
        let imports = import_statements(text);
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].default.as_deref(), Some("Default"));
        assert_eq!(
            imports[0].named,
            vec![
                ("format".to_string(), "fmt".to_string()),
                ("parse".to_string(), "parse".to_string())
            ]
        );
        assert_eq!(imports[0].source, "~/utils/format");
        let range = imports[0].named_range(text, "parse").unwrap();
        assert_eq!(&text[range], "parse");
        assert_eq!(imports[1].namespace.as_deref(), Some("all"));
        assert!(imports[2].type_only);

        let bare = bare_imports(text);
        let sources: Vec<&str> = bare.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(sources, vec!["../plugins/auth", "./side-effect"]);
    }

    #[test]
    fn test_call_and_type_usages() {
        let text = "const a = useFoo()\nconst b = useFoo<number>()\nconst c = myuseFoo()\nconst d = useFooBar()\nlet x: Fmt = y as Fmt<T>; let z: FmtLong";
        let calls = call_usages(text, "useFoo");
        assert_eq!(calls.len(), 2);
        assert_eq!(&text[calls[0].clone()], "useFoo");

        let types = type_usages(text, "Fmt");
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn test_word_occurrences() {
        let text = "fmt(fmtx, xfmt, fmt)";
        assert_eq!(word_occurrences(text, "fmt"), vec![0, 16]);
    }

    #[test]
    fn test_app_property_usages() {
        let text = "useNuxtApp().$hello('a')\nnuxtApp.$hello\nthis.$hello\nVue.prototype.$hello\napp.config.globalProperties.$hello\nother.$hello\nnuxtApp.$helloWorld";
        assert_eq!(app_property_usages(text, "hello").len(), 5);

        let destructured = "const { $hello, $api: client } = useNuxtApp()";
        let keys = destructured_app_keys(destructured);
        let names: Vec<&str> = keys.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["hello", "api"]);
        assert_eq!(&destructured[keys[0].1.clone()], "$hello");
    }

    #[test]
    fn test_directive_usages() {
        let text = "<input v-focus v-focus-trap :v-focus=\"x\" v-focus=\"true\">";
        let ranges = directive_usages(text, "focus");
        assert_eq!(ranges.len(), 2);
        assert_eq!(&text[ranges[0].clone()], "v-focus");
    }

    #[test]
    fn test_component_tags() {
        let text = "<FooBar/>\n<foo-bar\n  :a=\"1\"\n/>\n<FooBarBaz />\n<LazyFooBar></LazyFooBar>";
        let names = vec!["FooBar".to_string(), "foo-bar".to_string(), "LazyFooBar".to_string()];
        let tags = component_tags(text, &names);
        let matched: Vec<&str> = tags.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(matched, vec!["<FooBar/>", "<foo-bar\n  :a=\"1\"\n/>", "<LazyFooBar>"]);
    }

    #[test]
    fn test_component_tags_with_quoted_angle_brackets() {
        let text = "<FooBar :show=\"count > 0\"\n  title='a > b'\n  label=\"x\" />\n<p>after</p>";
        let names = vec!["FooBar".to_string()];
        let tags = component_tags(text, &names);
        assert_eq!(tags.len(), 1);
        assert_eq!(
            &text[tags[0].clone()],
            "<FooBar :show=\"count > 0\"\n  title='a > b'\n  label=\"x\" />"
        );
    }
}
