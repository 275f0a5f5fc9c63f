//! Offset arithmetic and lexical context for matched text.
//!
//! Patterns match raw text, so every match is checked against the region it
//! landed in: script code, a string or comment, or a template position.

use std::ops::Range;

/// Maps byte offsets to 1-indexed lines and 0-indexed byte columns.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// `(line, column)` of a byte offset.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.line_starts[line])
    }

    /// Byte offset of a 1-indexed line and 0-indexed column.
    pub fn offset(&self, line: usize, col: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).map(|start| start + col)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Byte range of the line containing `offset`, without the newline.
pub fn line_bounds(text: &str, offset: usize) -> Range<usize> {
    let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[offset..].find('\n').map(|i| offset + i).unwrap_or(text.len());
    start..end
}

/// String literal and comment ranges inside `range`.
///
/// Handles `'`, `"` and template literals (with `${}` holes treated as code),
/// line comments and block comments. Regex literals are not recognised.
pub fn non_code_ranges(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = range.start;
    // Brace depth per open `${` hole; a `}` at depth 0 resumes the template.
    let mut holes: Vec<usize> = Vec::new();

    while i < range.end {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = text[i..range.end].find('\n').map(|n| i + n).unwrap_or(range.end);
                out.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = text[i + 2..range.end]
                    .find("*/")
                    .map(|n| i + 2 + n + 2)
                    .unwrap_or(range.end);
                out.push(i..end);
                i = end;
            }
            quote @ (b'\'' | b'"') => {
                let start = i;
                i += 1;
                while i < range.end && bytes[i] != quote && bytes[i] != b'\n' {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i = (i + 1).min(range.end);
                out.push(start..i);
            }
            b'`' => {
                let (end, hole) = scan_template_literal(bytes, i + 1, range.end);
                out.push(i..end);
                i = end;
                if hole {
                    holes.push(0);
                }
            }
            b'{' if !holes.is_empty() => {
                if let Some(depth) = holes.last_mut() {
                    *depth += 1;
                }
                i += 1;
            }
            b'}' if !holes.is_empty() => {
                let closes_hole = holes.last() == Some(&0);
                if closes_hole {
                    holes.pop();
                    let (end, hole) = scan_template_literal(bytes, i + 1, range.end);
                    out.push(i..end);
                    i = end;
                    if hole {
                        holes.push(0);
                    }
                } else {
                    if let Some(depth) = holes.last_mut() {
                        *depth -= 1;
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    out
}

/// Scan a template literal body from `i`. Returns the end of the string
/// part and whether it stopped at a `${` hole.
fn scan_template_literal(bytes: &[u8], mut i: usize, end: usize) -> (usize, bool) {
    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return (i + 1, false),
            b'$' if bytes.get(i + 1) == Some(&b'{') => return (i + 2, true),
            _ => i += 1,
        }
    }
    (end, false)
}

fn contains_offset(ranges: &[Range<usize>], offset: usize) -> bool {
    let idx = ranges.partition_point(|r| r.end <= offset);
    ranges.get(idx).map(|r| r.start <= offset).unwrap_or(false)
}

/// Where a matched offset sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Script code outside strings and comments
    Code,
    /// Inside a string literal or comment
    StringOrComment,
    /// Value of a bound template attribute (`:x`, `@x`, `v-x`, `#x`)
    TemplateBinding,
    /// Inside `{{ }}`
    TemplateInterpolation,
    /// Inside a template tag, outside any attribute value
    TemplateTag,
    /// Template text or a static attribute value
    TemplateStatic,
    /// Style blocks and anything else
    Other,
}

impl Region {
    /// Whether an identifier here is evaluated as an expression.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Region::Code | Region::TemplateBinding | Region::TemplateInterpolation
        )
    }
}

/// Script/template layout of one document.
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    scripts: Vec<Range<usize>>,
    template: Option<Range<usize>>,
    non_code: Vec<Range<usize>>,
}

impl DocumentLayout {
    /// Build the layout. Single-file components are split into `<script>`
    /// blocks and the outer `<template>`; any other file is all script.
    pub fn new(text: &str, is_component: bool) -> Self {
        let (scripts, template) = if is_component {
            (script_blocks(text), template_block(text))
        } else {
            (vec![0..text.len()], None)
        };
        let mut non_code: Vec<Range<usize>> = scripts
            .iter()
            .flat_map(|range| non_code_ranges(text, range.clone()))
            .collect();
        non_code.sort_by_key(|r| r.start);

        Self {
            scripts,
            template,
            non_code,
        }
    }

    pub fn for_path(text: &str, path: &std::path::Path) -> Self {
        let is_component = path.extension().and_then(|e| e.to_str()) == Some("vue");
        Self::new(text, is_component)
    }

    pub fn scripts(&self) -> &[Range<usize>] {
        &self.scripts
    }

    pub fn template(&self) -> Option<&Range<usize>> {
        self.template.as_ref()
    }

    pub fn in_script(&self, offset: usize) -> bool {
        self.scripts.iter().any(|r| r.contains(&offset))
    }

    pub fn in_template(&self, offset: usize) -> bool {
        self.template.as_ref().map(|r| r.contains(&offset)).unwrap_or(false)
    }

    pub fn region_at(&self, text: &str, offset: usize) -> Region {
        if self.in_script(offset) {
            if contains_offset(&self.non_code, offset) {
                Region::StringOrComment
            } else {
                Region::Code
            }
        } else if let Some(template) = &self.template {
            if template.contains(&offset) {
                template_region(text, template.start, offset)
            } else {
                Region::Other
            }
        } else {
            Region::Other
        }
    }
}

/// Content ranges of every `<script ...>` block.
fn script_blocks(text: &str) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut from = 0;
    while let Some(open) = text[from..].find("<script").map(|i| from + i) {
        let Some(content_start) = text[open..].find('>').map(|i| open + i + 1) else {
            break;
        };
        let content_end = text[content_start..]
            .find("</script>")
            .map(|i| content_start + i)
            .unwrap_or(text.len());
        blocks.push(content_start..content_end);
        from = content_end;
    }
    blocks
}

/// Range of the outer `<template>` block, from its opening `<` to its
/// closing tag.
fn template_block(text: &str) -> Option<Range<usize>> {
    let start = text.find("<template")?;
    let end = text.rfind("</template>").filter(|end| *end > start).unwrap_or(text.len());
    Some(start..end)
}

/// Classify an offset inside a template.
fn template_region(text: &str, template_start: usize, offset: usize) -> Region {
    let before = &text[template_start..offset];

    if let Some(tag_start) = open_tag_start(before) {
        let tag_text = &before[tag_start..];
        return match open_attribute_name(tag_text) {
            Some(name) if is_binding_attribute(name) => Region::TemplateBinding,
            Some(_) => Region::TemplateStatic,
            None => Region::TemplateTag,
        };
    }

    match (before.rfind("{{"), before.rfind("}}")) {
        (Some(open), Some(close)) if open > close => Region::TemplateInterpolation,
        (Some(_), None) => Region::TemplateInterpolation,
        _ => Region::TemplateStatic,
    }
}

/// Start of the unclosed tag `before` ends inside, if any.
fn open_tag_start(before: &str) -> Option<usize> {
    let bytes = before.as_bytes();
    let mut search_end = before.len();
    while let Some(lt) = before[..search_end].rfind('<') {
        let next = bytes.get(lt + 1).copied();
        let starts_tag = matches!(next, Some(c) if c.is_ascii_alphabetic() || c == b'/');
        if starts_tag {
            return if tag_still_open(&before[lt..]) { Some(lt) } else { None };
        }
        search_end = lt;
    }
    None
}

/// Whether no unquoted `>` closes the tag text.
fn tag_still_open(tag_text: &str) -> bool {
    let mut quote: Option<char> = None;
    for c in tag_text.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return false,
            _ => {}
        }
    }
    true
}

/// Name of the attribute whose quoted value `tag_text` ends inside.
fn open_attribute_name(tag_text: &str) -> Option<&str> {
    let mut quote: Option<(char, usize)> = None;
    for (i, c) in tag_text.char_indices() {
        match quote {
            Some((q, _)) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some((c, i)),
            None => {}
        }
    }
    let (_, quote_at) = quote?;
    let before_value = tag_text[..quote_at].trim_end();
    let before_eq = before_value.strip_suffix('=')?.trim_end();
    let name_start = before_eq
        .rfind(|c: char| c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(0);
    Some(&before_eq[name_start..])
}

/// Whether an attribute name binds an expression.
pub fn is_binding_attribute(name: &str) -> bool {
    name.starts_with(':') || name.starts_with('@') || name.starts_with('#') || name.starts_with("v-")
}

/// Range of the balanced block opened at `open` (`(`, `{` or `[`),
/// including both delimiters. String contents are skipped.
pub fn balanced_block(text: &str, open: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let (open_ch, close_ch) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
            }
            c if c == open_ch => depth += 1,
            c if c == close_ch => {
                depth -= 1;
                if depth == 0 {
                    return Some(open..i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Previous non-whitespace identifier before `offset`, if any.
pub fn preceding_word(text: &str, offset: usize) -> Option<&str> {
    let head = text[..offset].trim_end();
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '$'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let word = &head[start..];
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// Previous non-whitespace character before `offset`.
pub fn preceding_char(text: &str, offset: usize) -> Option<char> {
    text[..offset].trim_end().chars().next_back()
}

/// Whether the character before `offset` continues an identifier.
pub fn is_identifier_continuation(text: &str, offset: usize) -> bool {
    text[..offset]
        .chars()
        .next_back()
        .map(|c| c.is_alphanumeric() || c == '_' || c == '$')
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_positions() {
        let text = "ab\ncd\n\nef";
        let index = LineIndex::new(text);
        assert_eq!(index.position(0), (1, 0));
        assert_eq!(index.position(1), (1, 1));
        assert_eq!(index.position(3), (2, 0));
        assert_eq!(index.position(6), (3, 0));
        assert_eq!(index.position(8), (4, 1));
        assert_eq!(index.offset(2, 1), Some(4));
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_line_bounds() {
        let text = "one\ntwo\nthree";
        assert_eq!(&text[line_bounds(text, 5)], "two");
        assert_eq!(&text[line_bounds(text, 0)], "one");
        assert_eq!(&text[line_bounds(text, 10)], "three");
    }

    #[test]
    fn test_non_code_ranges() {
        let text = "const a = 'x(y)'; // call(z)\n/* b() */ c(`t ${d()} u`)";
        let ranges = non_code_ranges(text, 0..text.len());
        let pieces: Vec<&str> = ranges.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(pieces, vec!["'x(y)'", "// call(z)", "/* b() */", "`t ${", "} u`"]);
    }

    #[test]
    fn test_script_regions() {
        let text = "const s = \"useFoo()\"\nuseFoo()";
        let layout = DocumentLayout::new(text, false);
        assert_eq!(layout.region_at(text, text.find("useFoo").unwrap()), Region::StringOrComment);
        assert_eq!(layout.region_at(text, text.rfind("useFoo").unwrap()), Region::Code);
    }

    #[test]
    fn test_component_regions() {
        let text = concat!(
            "<template>\n",
            "  <div class=\"fmt\" :title=\"fmt(x)\" @click=\"go()\">{{ fmt(y) }} fmt</div>\n",
            "</template>\n",
            "<script setup>\nconst v = fmt(1)\n</script>\n",
            "<style>.fmt { color: red }</style>\n"
        );
        let layout = DocumentLayout::new(text, true);
        let at = |needle: &str| layout.region_at(text, text.find(needle).unwrap());

        assert_eq!(at("fmt\" :"), Region::TemplateStatic);
        assert_eq!(at("fmt(x)"), Region::TemplateBinding);
        assert_eq!(at("go()"), Region::TemplateBinding);
        assert_eq!(at("fmt(y)"), Region::TemplateInterpolation);
        assert_eq!(at("fmt</div>"), Region::TemplateStatic);
        assert_eq!(at("class"), Region::TemplateTag);
        assert_eq!(at("fmt(1)"), Region::Code);
        assert_eq!(at(".fmt {"), Region::Other);
        assert!(Region::TemplateBinding.is_expression());
        assert!(!Region::TemplateStatic.is_expression());
    }

    #[test]
    fn test_comparison_inside_binding_keeps_tag_open() {
        let text = "<template><div :show=\"a > b && fmt()\" /></template>";
        let layout = DocumentLayout::new(text, true);
        assert_eq!(layout.region_at(text, text.find("fmt").unwrap()), Region::TemplateBinding);
    }

    #[test]
    fn test_balanced_block() {
        let text = "define({ a: '}', b: { c: 1 } }) tail";
        let open = text.find('{').unwrap();
        let block = balanced_block(text, open).unwrap();
        assert_eq!(&text[block], "{ a: '}', b: { c: 1 } }");
        assert_eq!(balanced_block(text, 0), None);
        assert_eq!(balanced_block("( unclosed", 0), None);
    }

    #[test]
    fn test_preceding_helpers() {
        let text = "export function useFoo";
        let offset = text.find("useFoo").unwrap();
        assert_eq!(preceding_word(text, offset), Some("function"));
        assert_eq!(preceding_char("a.b", 2), Some('.'));
        assert!(is_identifier_continuation("xuseFoo", 1));
        assert!(!is_identifier_continuation(" useFoo", 1));
    }

    #[test]
    fn test_preceding_word_after_multibyte_characters() {
        let text = "// wrapper — useFoo()";
        let offset = text.find("useFoo").unwrap();
        assert_eq!(preceding_word(text, offset), None);

        let text = "a→b useFoo";
        let offset = text.find("useFoo").unwrap();
        assert_eq!(preceding_word(text, offset), Some("b"));

        let text = "été useFoo";
        let offset = text.find("useFoo").unwrap();
        assert_eq!(preceding_word(text, offset), Some("été"));
    }
}
