//! Data model for the documentation pipeline — catalog input and enriched output.

use serde::Deserialize;
use std::collections::BTreeMap;

/// One raw entry from the story catalog (`stories.json` / `index.json`).
///
/// Every field is optional: the catalog generator upstream emits weakly
/// structured JSON and malformed entries must degrade to nulls, not errors.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StoryEntry {
    pub id: Option<String>,
    /// Slash-delimited category/component path, e.g. `"Hooks/UseBoolean"`.
    pub title: Option<String>,
    /// Story name within the component, e.g. `"Default"`.
    pub name: Option<String>,
    /// `"story"`, `"docs"`, or anything else.
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    /// Relative path to the originating source file.
    #[serde(rename = "importPath")]
    pub import_path: Option<String>,
    pub parameters: Option<Parameters>,
    #[serde(rename = "componentInfo")]
    pub component_info: Option<ComponentInfo>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub docs: Option<DocsParameters>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DocsParameters {
    pub description: Option<DocsDescription>,
    pub source: Option<DocsSource>,
}

/// Authored description text carried in the catalog itself.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DocsDescription {
    pub component: Option<String>,
    pub story: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DocsSource {
    pub code: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ComponentInfo {
    pub props: Option<BTreeMap<String, PropInfo>>,
}

/// Prop metadata keyed by prop name in the catalog.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PropInfo {
    pub control: Option<String>,
    pub description: Option<String>,
    pub options: Option<Vec<String>>,
}

impl StoryEntry {
    pub fn component_description(&self) -> Option<&str> {
        self.parameters
            .as_ref()?
            .docs
            .as_ref()?
            .description
            .as_ref()?
            .component
            .as_deref()
    }

    pub fn story_description(&self) -> Option<&str> {
        self.parameters
            .as_ref()?
            .docs
            .as_ref()?
            .description
            .as_ref()?
            .story
            .as_deref()
    }

    pub fn source_code(&self) -> Option<&str> {
        self.parameters
            .as_ref()?
            .docs
            .as_ref()?
            .source
            .as_ref()?
            .code
            .as_deref()
    }
}

/// One example story after enrichment.
///
/// `description` is always present — the fallback chain terminates in a
/// generated default. `source` stays null when no snippet was found.
#[derive(Debug, Clone)]
pub struct EnrichedStory {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub source: Option<String>,
}

/// The grouped, enriched representation of one documented component.
///
/// `title` is unique across a run; `stories` keep catalog encounter order.
#[derive(Debug, Default, Clone)]
pub struct ComponentRecord {
    pub title: String,
    pub description: Option<String>,
    pub props: BTreeMap<String, PropInfo>,
    pub stories: Vec<EnrichedStory>,
    pub storybook_url: Option<String>,
    pub import_path: Option<String>,
}

/// One written markdown file, collected for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Relative path used both on disk and as the remote object key.
    pub relative_path: String,
    pub component: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_tolerates_missing_fields() {
        let entry: StoryEntry = serde_json::from_str("{}").unwrap();
        assert!(entry.id.is_none());
        assert!(entry.component_description().is_none());
        assert!(entry.source_code().is_none());
    }

    #[test]
    fn entry_reads_nested_docs() {
        let json = r#"{
            "id": "ai-actions--default",
            "title": "AI/Actions",
            "name": "Default",
            "type": "story",
            "importPath": "./src/stories/Actions.stories.tsx",
            "parameters": {
                "docs": {
                    "description": { "component": "Action buttons.", "story": "The default." },
                    "source": { "code": "<Actions />" }
                }
            }
        }"#;
        let entry: StoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.component_description(), Some("Action buttons."));
        assert_eq!(entry.story_description(), Some("The default."));
        assert_eq!(entry.source_code(), Some("<Actions />"));
        assert_eq!(entry.entry_type.as_deref(), Some("story"));
    }

    #[test]
    fn entry_tolerates_extra_fields() {
        let json = r#"{"id": "x", "tags": ["dev"], "unknown": {"a": 1}}"#;
        let entry: StoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_deref(), Some("x"));
    }
}
