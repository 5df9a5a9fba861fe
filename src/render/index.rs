//! Category index renderer — the README.md at the output root.

use crate::model::ComponentRecord;
use crate::render::{category_name, component_name, import_statement, PACKAGE_NAME};

/// Render the index document: components grouped by category (sorted
/// lexicographically), each component sorted by its last title segment.
pub fn render(records: &[ComponentRecord], timestamp: &str) -> String {
    let mut categories: Vec<&str> = records
        .iter()
        .map(|r| category_name(&r.title))
        .collect();
    categories.sort_unstable();
    categories.dedup();

    let mut lines: Vec<String> = Vec::new();

    lines.push("# Component Documentation\n".to_string());
    lines.push(format!("**Generated:** {}\n", timestamp));

    lines.push("## Quick Start\n".to_string());
    lines.push("```tsx".to_string());
    lines.push(format!(
        "import {{ Conversation, Message }} from '{}';",
        PACKAGE_NAME
    ));
    lines.push(String::new());
    lines.push("export function Chat() {".to_string());
    lines.push("  return (".to_string());
    lines.push("    <Conversation>".to_string());
    lines.push("      <Message from=\"user\">Hello!</Message>".to_string());
    lines.push("    </Conversation>".to_string());
    lines.push("  );".to_string());
    lines.push("}".to_string());
    lines.push("```\n".to_string());

    for category in &categories {
        lines.push(format!("### {}\n", category));

        let mut members: Vec<&ComponentRecord> = records
            .iter()
            .filter(|r| category_name(&r.title) == *category)
            .collect();
        members.sort_by(|a, b| component_name(&a.title).cmp(component_name(&b.title)));

        for record in members {
            lines.push(format!("- `{}`", import_statement(&record.title)));
            if let Some(ref description) = record.description {
                lines.push(format!("  {}", description));
            }
        }
        lines.push(String::new());
    }

    lines.push("## Summary\n".to_string());
    lines.push(format!("- **Components:** {}", records.len()));
    lines.push(format!(
        "- **Categories:** {} ({})",
        categories.len(),
        categories.join(", ")
    ));
    lines.push(String::new());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, description: Option<&str>) -> ComponentRecord {
        ComponentRecord {
            title: title.to_string(),
            description: description.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn categories_sorted_components_sorted_by_last_segment() {
        let records = vec![
            record("Hooks/UseBoolean", None),
            record("AI/Message", Some("A chat message.")),
            record("AI/Actions", None),
            record("Button", None),
        ];
        let doc = render(&records, "t");

        let ai = doc.find("### AI").unwrap();
        let hooks = doc.find("### Hooks").unwrap();
        let other = doc.find("### Other").unwrap();
        assert!(ai < hooks && hooks < other);

        let actions = doc.find("import { Actions }").unwrap();
        let message = doc.find("import { Message }").unwrap();
        assert!(actions < message);

        assert!(doc.contains("  A chat message."));
        assert!(doc.contains("- **Components:** 4"));
        assert!(doc.contains("- **Categories:** 3 (AI, Hooks, Other)"));
    }

    #[test]
    fn quick_start_sample_present() {
        let doc = render(&[], "t");
        assert!(doc.contains("## Quick Start"));
        assert!(doc.contains("import { Conversation, Message } from '@halcyon/chat-ui';"));
    }
}
