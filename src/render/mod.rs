//! Markdown rendering — pure, deterministic string builders plus the shared
//! title-to-path and title-to-export-name mapping rules.

pub mod component;
pub mod index;

/// Published package the import statements reference.
pub const PACKAGE_NAME: &str = "@halcyon/chat-ui";

/// Known mismatches between the documented title and the actual export name.
const EXPORT_ALIASES: &[(&str, &str)] = &[("AITask", "Task")];

/// Map a component title to its output file path, relative to the output
/// root. The folder is the lowercased first segment; the filename keeps the
/// last segment's original casing. This asymmetry is deliberate and shared
/// with the remote object keys.
///
/// `"AI/Actions"` → `ai/Actions.md`; `"Button"` → `Button.md`.
pub fn output_rel_path(title: &str) -> String {
    match title.split_once('/') {
        Some((category, rest)) => {
            let name = rest.rsplit('/').next().unwrap_or(rest);
            format!("{}/{}.md", category.to_lowercase(), name)
        }
        None => format!("{}.md", title),
    }
}

/// Last path segment of a title.
pub fn component_name(title: &str) -> &str {
    title.rsplit('/').next().unwrap_or(title)
}

/// First path segment of a title; slashless titles group under `"Other"`.
pub fn category_name(title: &str) -> &str {
    match title.split_once('/') {
        Some((category, _)) => category,
        None => "Other",
    }
}

/// Derive the export identifier for a component title. Hook names (`Use`
/// followed by an uppercase letter) keep the `use` prefix but lowercase its
/// first letter; everything else uppercases its first letter. The alias
/// table overrides known mismatches.
pub fn export_name(title: &str) -> String {
    let name = component_name(title);
    if let Some((_, export)) = EXPORT_ALIASES.iter().find(|(alias, _)| *alias == name) {
        return (*export).to_string();
    }
    if let Some(rest) = name.strip_prefix("Use") {
        if rest.starts_with(char::is_uppercase) {
            return format!("u{}", &name[1..]);
        }
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Synthesized import statement for a component title.
pub fn import_statement(title: &str) -> String {
    format!("import {{ {} }} from '{}';", export_name(title), PACKAGE_NAME)
}

/// Deep link into the hosted documentation for one story id.
pub fn story_url(base: &str, id: &str) -> String {
    format!("{}/?path=/story/{}", base.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_mapping_with_category() {
        assert_eq!(output_rel_path("AI/Actions"), "ai/Actions.md");
        assert_eq!(output_rel_path("Hooks/UseBoolean"), "hooks/UseBoolean.md");
    }

    #[test]
    fn path_mapping_without_category() {
        assert_eq!(output_rel_path("Button"), "Button.md");
    }

    #[test]
    fn path_mapping_deep_title_uses_last_segment() {
        assert_eq!(output_rel_path("AI/Chat/Message"), "ai/Message.md");
    }

    #[test]
    fn category_grouping() {
        assert_eq!(category_name("AI/Actions"), "AI");
        assert_eq!(category_name("Button"), "Other");
    }

    #[test]
    fn export_name_for_hooks() {
        assert_eq!(export_name("Hooks/UseBoolean"), "useBoolean");
        assert_eq!(export_name("Hooks/UseLocalStorage"), "useLocalStorage");
    }

    #[test]
    fn export_name_for_components() {
        assert_eq!(export_name("AI/Actions"), "Actions");
        assert_eq!(export_name("codeBlock"), "CodeBlock");
        // `Use` followed by a lowercase letter is not a hook name.
        assert_eq!(export_name("Display/UserCard"), "UserCard");
    }

    #[test]
    fn export_name_alias_table() {
        assert_eq!(export_name("AI/AITask"), "Task");
    }

    #[test]
    fn import_statement_format() {
        assert_eq!(
            import_statement("Hooks/UseBoolean"),
            "import { useBoolean } from '@halcyon/chat-ui';"
        );
    }

    #[test]
    fn story_url_format() {
        assert_eq!(
            story_url("https://docs.example.com/", "ai-actions--default"),
            "https://docs.example.com/?path=/story/ai-actions--default"
        );
    }
}
