//! Naming-convention helpers.
//!
//! Components are referenced by PascalCase or kebab-case tag names, stores by
//! a `use<Id>Store` hook, and nested component files by the concatenation of
//! their path segments.

use std::path::{Component, Path};

/// Convert PascalCase/camelCase to kebab-case.
///
/// A hyphen goes before an uppercase letter that follows a lowercase letter
/// or digit, and before the last uppercase letter of an uppercase run that is
/// followed by a lowercase letter (`HTMLParser` → `html-parser`).
pub fn pascal_to_kebab(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Convert kebab-case to PascalCase.
pub fn kebab_to_pascal(s: &str) -> String {
    s.split('-').map(capitalize).collect()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Conventional hook name for a store id: `cart` → `useCartStore`.
pub fn hook_name_for(store_id: &str) -> String {
    let name: String = store_id
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect();
    format!("use{}Store", name)
}

/// Alternate spellings of a store id: separator swaps plus singular/plural
/// forms. The original id is always first.
pub fn store_id_variants(store_id: &str) -> Vec<String> {
    let mut variants = vec![store_id.to_string()];
    let mut push = |v: String| {
        if !v.is_empty() && !variants.contains(&v) {
            variants.push(v);
        }
    };

    for sep in ['-', '_', ' '] {
        push(store_id.replace(['-', '_', ' '], &sep.to_string()));
    }

    if let Some(stem) = store_id.strip_suffix("ies") {
        push(format!("{}y", stem));
    } else if let Some(stem) = store_id.strip_suffix('s') {
        push(stem.to_string());
    } else if let Some(stem) = store_id.strip_suffix('y') {
        push(format!("{}ies", stem));
        push(format!("{}s", store_id));
    } else {
        push(format!("{}s", store_id));
    }

    variants
}

/// Hook names for every store id variant, conventional name first.
pub fn hook_name_variants(store_id: &str) -> Vec<String> {
    let mut hooks: Vec<String> = Vec::new();
    for variant in store_id_variants(store_id) {
        let hook = hook_name_for(&variant);
        if !hooks.contains(&hook) {
            hooks.push(hook);
        }
    }
    hooks
}

/// PascalCase a single path segment, splitting words on `-`, `_` and `.`.
fn segment_to_pascal(segment: &str) -> String {
    segment
        .split(['-', '_', '.'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect()
}

/// Component name for a file path relative to its components directory.
///
/// `foo/bar-baz.vue` → `FooBarBaz`, `foo/index.vue` → `Foo`. A file name
/// that already starts with its directory prefix does not repeat it
/// (`base/BaseButton.vue` → `BaseButton`).
pub fn component_name_from_path(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.last_mut() {
        for suffix in [".client", ".server"] {
            if let Some(stripped) = last.strip_suffix(suffix) {
                *last = stripped.to_string();
            }
        }
    }
    if segments.len() > 1 && segments.last().map(|s| s == "index").unwrap_or(false) {
        segments.pop();
    }

    let mut name = String::new();
    for segment in segments {
        let pascal = segment_to_pascal(&segment);
        if !name.is_empty() && starts_with_words(&pascal, &name) {
            name = pascal;
        } else {
            name.push_str(&pascal);
        }
    }
    name
}

/// Whether `name`'s kebab words begin with all of `prefix`'s kebab words.
fn starts_with_words(name: &str, prefix: &str) -> bool {
    let name = pascal_to_kebab(name);
    let prefix = pascal_to_kebab(prefix);
    let name_words: Vec<&str> = name.split('-').collect();
    let prefix_words: Vec<&str> = prefix.split('-').collect();
    name_words.len() >= prefix_words.len() && name_words.starts_with(&prefix_words)
}

/// Layout name for a file path relative to its layouts directory.
///
/// Layout names are kebab-case: `admin/Panel.vue` → `admin-panel`.
pub fn layout_name_from_path(relative: &Path) -> String {
    pascal_to_kebab(&component_name_from_path(relative))
}

/// Base name of a plugin or middleware file without environment or
/// `.global` suffixes: `auth.client.ts` → `auth`.
pub fn module_name_from_file(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.split('.').next()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
