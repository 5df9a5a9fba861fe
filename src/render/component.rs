//! Per-component markdown document renderer.

use crate::model::ComponentRecord;
use crate::render::{import_statement, story_url};

/// Render one component record into a markdown document. Pure: the same
/// record and timestamp produce byte-identical output.
pub fn render(record: &ComponentRecord, timestamp: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}\n", record.title));

    if let Some(ref description) = record.description {
        lines.push(description.clone());
        lines.push(String::new());
    }

    lines.push(format!("**Last Updated:** {}\n", timestamp));

    if let Some(ref url) = record.storybook_url {
        lines.push(format!("[View in Storybook]({})\n", url));
    }

    lines.push("## Import\n".to_string());
    lines.push("```tsx".to_string());
    lines.push(import_statement(&record.title));
    lines.push("```\n".to_string());

    if !record.props.is_empty() {
        lines.push("## Props\n".to_string());
        lines.push("| Prop | Type | Description | Options |".to_string());
        lines.push("| ---- | ---- | ----------- | ------- |".to_string());
        for (name, prop) in &record.props {
            lines.push(format!(
                "| `{}` | {} | {} | {} |",
                name,
                prop.control.as_deref().unwrap_or("-"),
                prop.description.as_deref().unwrap_or("-"),
                prop.options
                    .as_ref()
                    .map(|opts| opts.join(", "))
                    .unwrap_or_else(|| "-".to_string()),
            ));
        }
        lines.push(String::new());
    }

    if !record.stories.is_empty() {
        lines.push("## Stories\n".to_string());
        for story in &record.stories {
            lines.push(format!("### {}\n", story.name));
            lines.push(story.description.clone());
            lines.push(String::new());

            if let Some(ref source) = story.source {
                lines.push("```tsx".to_string());
                lines.push(source.clone());
                lines.push("```\n".to_string());
            }

            if let (Some(url), Some(id)) = (record.storybook_url.as_deref(), story.id.as_deref()) {
                lines.push(format!("[View story in Storybook]({})\n", story_url(url, id)));
            }
        }
    }

    lines.push("---\n".to_string());
    lines.push(format!("*Generated by storydoc on {}*", timestamp));
    lines.push(String::new());

    lines.join("\n")
}
