//! Source-snippet extraction — locate a story's export block and pull out
//! either its authored `source.code` override or its `render:` expression.

use regex::Regex;
use std::sync::LazyLock;

static RE_SOURCE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)source:\s*\{\s*code:\s*(?:`([^`]*)`|'([^']*)'|"([^"]*)")"#).unwrap()
});

// Captures up to the next comma-then-identifier-colon or the end of the
// block body. Cannot tell top-level keys from nested ones; in practice
// `render` is the last key of a story object.
static RE_RENDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)render:\s*(.+?)(?:,\s*[A-Za-z_$][\w$]*\s*:|\s*$)").unwrap()
});

/// Derive the export-identifier candidates for a story name, deduplicated
/// preserving order:
///
/// | name           | candidates                                          |
/// |----------------|-----------------------------------------------------|
/// | `With Icons`   | `WithIcons`, `With-Icons`, `Withicons`, `withIcons` |
/// | `Default`      | `Default`, `default`                                |
pub fn story_name_variants(name: &str) -> Vec<String> {
    let words: Vec<&str> = name.split_whitespace().collect();

    let joined: String = words.concat();
    let hyphenated = words.join("-");
    // First word keeps its casing, later words get a lowercased first letter.
    let joined_lower_rest: String = words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { (*w).to_string() } else { lower_first(w) })
        .collect();
    let camel = lower_first(&joined);

    let mut variants = Vec::new();
    for candidate in [joined, hyphenated, joined_lower_rest, camel] {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Extract a source snippet for the named story from source text.
///
/// Finds `export const <candidate>` (optionally type-annotated) followed by
/// an object literal, scans to the matching closing brace, and pulls the
/// authored `source.code` value or the `render:` expression from the block.
/// Returns None when no export matches or the block carries neither; a
/// missing snippet renders as an absent code section, not placeholder text.
pub fn extract(text: &str, story_name: &str) -> Option<String> {
    for candidate in story_name_variants(story_name) {
        let pattern = format!(
            r"export\s+const\s+{}\s*(?::\s*[A-Za-z_$][\w$<>\[\],.\s]*?)?=\s*\{{",
            regex::escape(&candidate)
        );
        let re = Regex::new(&pattern).ok()?;
        let Some(found) = re.find(text) else {
            continue;
        };

        let open = found.end() - 1;
        let close = matching_brace(text, open)?;
        let body = &text[open + 1..close];

        if let Some(code) = source_code(body) {
            return Some(code);
        }
        // Found the export; do not keep trying other candidates.
        return render_expression(body);
    }
    None
}

/// Naive balanced-brace scan from the `{` at `open` to its matching `}`.
/// Does not account for braces inside string literals or comments; a literal
/// `}` in a string terminates the block early. Returns None when the block
/// never closes.
pub fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn source_code(body: &str) -> Option<String> {
    let caps = RE_SOURCE_CODE.captures(body)?;
    (1..caps.len())
        .filter_map(|i| caps.get(i))
        .map(|m| m.as_str().trim().to_string())
        .find(|s| !s.is_empty())
}

fn render_expression(body: &str) -> Option<String> {
    let caps = RE_RENDER.captures(body)?;
    let snippet = caps.get(1)?.as_str().trim();
    if snippet.is_empty() {
        None
    } else {
        Some(snippet.to_string())
    }
}
