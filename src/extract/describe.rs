//! Description extraction — regex fallback chains over story source text.
//!
//! Each pattern is a pure `&str -> Option<String>` step; chains compose
//! left to right, first match wins. The component-level and story-level
//! chains are symmetric, differing only in the object field searched
//! (`component:` vs `story:`).

use regex::{Captures, Regex};
use std::sync::LazyLock;

// Pattern (a): single-line `description: { component: '...' }`, any quote kind.
static RE_COMPONENT_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"description:[ \t]*\{[ \t]*component:[ \t]*(?:'([^'\n]*)'|"([^"\n]*)"|`([^`\n]*)`)"#,
    )
    .unwrap()
});

// Pattern (b): same, but a newline may separate the key from the quoted value.
static RE_COMPONENT_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"description:\s*\{\s*component:\s*(?:'([^']*)'|"([^"]*)")"#).unwrap()
});

// Pattern (c): template-literal value, possibly spanning lines.
static RE_COMPONENT_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)description:\s*\{\s*component:\s*`([^`]*)`").unwrap()
});

// Pattern (d): loose scan inside a docs block. The `[^}]*?` steps keep the
// match from crossing a closing brace of the immediate object.
static RE_COMPONENT_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)docs:\s*\{[^}]*?description:\s*\{[^}]*?component:\s*(?:'([^']*)'|"([^"]*)")"#)
        .unwrap()
});

static RE_STORY_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"description:[ \t]*\{[ \t]*story:[ \t]*(?:'([^'\n]*)'|"([^"\n]*)"|`([^`\n]*)`)"#)
        .unwrap()
});

static RE_STORY_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"description:\s*\{\s*story:\s*(?:'([^']*)'|"([^"]*)")"#).unwrap()
});

static RE_STORY_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)description:\s*\{\s*story:\s*`([^`]*)`").unwrap()
});

static RE_STORY_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)docs:\s*\{[^}]*?description:\s*\{[^}]*?story:\s*(?:'([^']*)'|"([^"]*)")"#)
        .unwrap()
});

// Line-scan patterns for the per-story heuristic.
static RE_LINE_STORY_DESC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"description:\s*\{\s*story:\s*(?:'([^']*)'|"([^"]*)"|`([^`]*)`)"#).unwrap()
});

static RE_LINE_BARE_DESC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"description:\s*(?:'([^']*)'|"([^"]*)"|`([^`]*)`)"#).unwrap()
});

/// Extract a component-level description from story source text.
pub fn component_description(text: &str) -> Option<String> {
    first_capture(&RE_COMPONENT_INLINE, text)
        .or_else(|| first_capture(&RE_COMPONENT_SPLIT, text))
        .or_else(|| first_capture(&RE_COMPONENT_TEMPLATE, text))
        .or_else(|| first_capture(&RE_COMPONENT_LOOSE, text))
}

/// Extract a story-level description from story source text.
///
/// Runs the symmetric regex chain first, then the per-story line-scan
/// heuristic keyed on the story's export declaration.
pub fn story_description(text: &str, story_name: &str) -> Option<String> {
    first_capture(&RE_STORY_INLINE, text)
        .or_else(|| first_capture(&RE_STORY_SPLIT, text))
        .or_else(|| first_capture(&RE_STORY_TEMPLATE, text))
        .or_else(|| first_capture(&RE_STORY_LOOSE, text))
        .or_else(|| story_line_scan(text, story_name))
}

/// Line-scan heuristic: find the `export const` line whose squashed text
/// contains the squashed story name (case-insensitive), then look through the
/// next 30 lines for an inline story description or a bare `description:`.
/// Lines mentioning `component:` are skipped to avoid cross-capturing the
/// component-level text.
fn story_line_scan(text: &str, story_name: &str) -> Option<String> {
    let needle = squash(story_name);
    if needle.is_empty() {
        return None;
    }

    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.contains("export const") && squash(line).contains(&needle))?;

    for line in lines.iter().skip(start + 1).take(30) {
        if line.contains("component:") {
            continue;
        }
        if let Some(found) = RE_LINE_STORY_DESC
            .captures(line)
            .and_then(|c| non_empty_group(&c))
        {
            return Some(found);
        }
        if let Some(found) = RE_LINE_BARE_DESC
            .captures(line)
            .and_then(|c| non_empty_group(&c))
        {
            return Some(found);
        }
    }

    None
}

/// Lowercase and strip all whitespace, for fuzzy name matching.
fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).and_then(|c| non_empty_group(&c))
}

/// First non-empty capture group: the quote-kind alternation puts the value
/// in one of several groups depending on which branch matched.
fn non_empty_group(caps: &Captures) -> Option<String> {
    (1..caps.len())
        .filter_map(|i| caps.get(i))
        .map(|m| m.as_str().to_string())
        .find(|s| !s.is_empty())
}

/// Generate a deterministic default description from a story name.
/// Never returns an empty string: this is the terminal step of the chain.
pub fn default_description(story_name: &str) -> String {
    let lower = story_name.trim().to_lowercase();

    if lower == "default" {
        return "The default implementation of this component.".to_string();
    }
    if lower.contains("variant") {
        return "Showcases the different visual variants of this component.".to_string();
    }
    if lower.contains("size") {
        return "Demonstrates the available sizes of this component.".to_string();
    }
    if lower.contains("state") {
        return "Demonstrates the various states of this component.".to_string();
    }
    if lower.contains("with") || lower.contains("without") {
        let rest = lower
            .trim_start_matches("without")
            .trim_start_matches("with")
            .trim();
        if rest.is_empty() {
            return "Shows the component with and without optional features.".to_string();
        }
        return format!("Shows the component {}.", lower);
    }
    if lower.contains("example") || lower.contains("demo") {
        return "An example usage of this component.".to_string();
    }

    let mut words = story_name.split_whitespace();
    match (words.next(), words.clone().next()) {
        (Some(first), Some(_)) => {
            let rest: Vec<&str> = words.collect();
            format!("Shows {} {}.", first.to_lowercase(), rest.join(" "))
        }
        (Some(first), None) => format!("Shows {} usage.", first.to_lowercase()),
        (None, _) => "Shows the component in use.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_component_description() {
        let text = "parameters: { docs: { description: { component: 'A chat bubble.' } } }";
        assert_eq!(component_description(text).as_deref(), Some("A chat bubble."));
    }

    #[test]
    fn split_line_component_description() {
        let text = "description: {\n      component:\n        \"Renders code.\",\n    }";
        assert_eq!(component_description(text).as_deref(), Some("Renders code."));
    }

    #[test]
    fn template_literal_component_description() {
        let text = "description: {\n  component: `Multi\nline text.`\n}";
        assert_eq!(
            component_description(text).as_deref(),
            Some("Multi\nline text.")
        );
    }

    #[test]
    fn loose_docs_block_component_description() {
        let text = "docs: { toc: true, description: { component: 'Loose match.' } }";
        assert_eq!(component_description(text).as_deref(), Some("Loose match."));
    }

    #[test]
    fn no_component_description() {
        assert_eq!(component_description("export const X = {};"), None);
    }

    #[test]
    fn story_description_inline() {
        let text = "description: { story: 'Shows icons.' }";
        assert_eq!(
            story_description(text, "With Icons").as_deref(),
            Some("Shows icons.")
        );
    }

    #[test]
    fn story_line_scan_matches_export() {
        let text = "\
export const WithAvatar: Story = {
  args: { avatar: true },
  parameters: {
    docs: {
      description: 'Message with an avatar.',
    },
  },
};
";
        // No `story:` key anywhere, so only the line scan can find this.
        assert_eq!(
            story_description(text, "With Avatar").as_deref(),
            Some("Message with an avatar.")
        );
    }

    #[test]
    fn story_line_scan_skips_component_lines() {
        let text = "\
export const Plain: Story = {
  parameters: { docs: { description: { component: 'Not this.' } } },
};
";
        assert_eq!(story_description(text, "Plain"), None);
    }

    #[test]
    fn story_line_scan_window_is_bounded() {
        let mut text = String::from("export const Deep: Story = {\n");
        for _ in 0..31 {
            text.push_str("  // filler\n");
        }
        text.push_str("  description: 'Too far down.',\n};\n");
        assert_eq!(story_description(&text, "Deep"), None);
    }

    #[test]
    fn default_description_default() {
        assert_eq!(
            default_description("Default"),
            "The default implementation of this component."
        );
    }

    #[test]
    fn default_description_buckets() {
        assert_eq!(
            default_description("Color Variants"),
            "Showcases the different visual variants of this component."
        );
        assert_eq!(
            default_description("All Sizes"),
            "Demonstrates the available sizes of this component."
        );
        assert_eq!(
            default_description("Loading States"),
            "Demonstrates the various states of this component."
        );
        assert_eq!(
            default_description("Interactive Demo"),
            "An example usage of this component."
        );
    }

    #[test]
    fn default_description_with_prefix() {
        assert_eq!(
            default_description("With Icons"),
            "Shows the component with icons."
        );
        assert_eq!(
            default_description("Without Border"),
            "Shows the component without border."
        );
        assert_eq!(
            default_description("With"),
            "Shows the component with and without optional features."
        );
    }

    #[test]
    fn default_description_synthesized() {
        assert_eq!(
            default_description("Streaming Response"),
            "Shows streaming Response."
        );
        assert_eq!(default_description("Primary"), "Shows primary usage.");
    }
}
