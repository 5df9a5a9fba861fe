//! Source loader — locate and parse the story catalog, normalize its shapes.
//!
//! Two top-level shapes exist in the wild:
//!
//! - `stories.json`: a flat mapping from story id to entry
//! - `index.json`: the same mapping wrapped in an `entries` field
//!
//! Either file may instead carry a `_components` key with pre-grouped
//! component records. Both shapes normalize into [`ComponentGroup`]s.

use crate::model::{ComponentInfo, DocsDescription, DocsParameters, DocsSource, Parameters, PropInfo, StoryEntry};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// The loaded catalog: raw entries in encounter order plus grouped components.
#[derive(Debug)]
pub struct Catalog {
    /// Every parseable entry, kept for `(title, name)` id lookups.
    pub entries: Vec<StoryEntry>,
    pub groups: Vec<ComponentGroup>,
}

/// All catalog entries sharing one component title, in encounter order.
#[derive(Debug)]
pub struct ComponentGroup {
    pub title: String,
    pub entries: Vec<StoryEntry>,
}

/// Locate and parse `stories.json` (preferred) or `index.json` in `dir`.
pub fn load(dir: &Path) -> Result<Catalog> {
    let value = read_catalog_file(dir)?;

    let Some(obj) = value.as_object() else {
        // Parse succeeded but the document is not a mapping. Nothing to group.
        return Ok(Catalog {
            entries: Vec::new(),
            groups: Vec::new(),
        });
    };

    let mut entries = Vec::new();
    for (key, entry_value) in obj {
        if key == "_components" || !entry_value.is_object() {
            continue;
        }
        // Entries are tolerant: every field optional, unknown fields ignored.
        if let Ok(entry) = serde_json::from_value::<StoryEntry>(entry_value.clone()) {
            entries.push(entry);
        }
    }

    let groups = match obj.get("_components") {
        Some(components) => pregrouped(components),
        None => group_entries(&entries),
    };

    Ok(Catalog { entries, groups })
}

/// Read and JSON-parse the catalog file, trying both known names.
fn read_catalog_file(dir: &Path) -> Result<serde_json::Value> {
    let stories = dir.join("stories.json");
    if stories.is_file() {
        let text = fs::read_to_string(&stories)
            .with_context(|| format!("failed to read {}", stories.display()))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", stories.display()));
    }

    let index = dir.join("index.json");
    if index.is_file() {
        let text = fs::read_to_string(&index)
            .with_context(|| format!("failed to read {}", index.display()))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", index.display()))?;
        // index.json wraps the mapping in an `entries` field
        if let Some(entries) = value.get("entries") {
            return Ok(entries.clone());
        }
        return Ok(value);
    }

    bail!(
        "no story catalog (stories.json or index.json) found in {}: build the story catalog first",
        dir.display()
    );
}

/// Group raw entries by title, preserving first-seen title order and
/// catalog encounter order within each group. `docs`-typed entries are
/// autogenerated pseudo-stories and are skipped.
fn group_entries(entries: &[StoryEntry]) -> Vec<ComponentGroup> {
    let mut groups: Vec<ComponentGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(title) = entry.title.as_deref() else {
            continue;
        };
        if entry.entry_type.as_deref() == Some("docs") {
            continue;
        }

        match index.get(title) {
            Some(&i) => groups[i].entries.push(entry.clone()),
            None => {
                index.insert(title.to_string(), groups.len());
                groups.push(ComponentGroup {
                    title: title.to_string(),
                    entries: vec![entry.clone()],
                });
            }
        }
    }

    groups
}

// -- Pre-grouped `_components` shape ------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawComponent {
    title: Option<String>,
    description: Option<String>,
    props: Option<BTreeMap<String, PropInfo>>,
    stories: Vec<RawStory>,
    #[serde(rename = "importPath")]
    import_path: Option<String>,
    #[serde(rename = "componentPath")]
    component_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStory {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    source: Option<String>,
}

/// Normalize the `_components` shape into groups of synthetic entries so the
/// enrichment stage sees a single uniform input.
fn pregrouped(components: &serde_json::Value) -> Vec<ComponentGroup> {
    let raw: Vec<RawComponent> = match components {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
        serde_json::Value::Object(map) => map
            .values()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
        _ => Vec::new(),
    };

    let mut groups = Vec::new();
    for component in raw {
        let Some(title) = component.title else {
            continue;
        };
        let import_path = component.component_path.or(component.import_path);

        let mut entries: Vec<StoryEntry> = component
            .stories
            .iter()
            .map(|story| StoryEntry {
                id: story.id.clone(),
                title: Some(title.clone()),
                name: story.name.clone(),
                entry_type: Some("story".to_string()),
                import_path: import_path.clone(),
                parameters: Some(Parameters {
                    docs: Some(DocsParameters {
                        description: Some(DocsDescription {
                            component: component.description.clone(),
                            story: story.description.clone(),
                        }),
                        source: story.source.clone().map(|code| DocsSource { code: Some(code) }),
                    }),
                }),
                component_info: None,
            })
            .collect();

        // A component with no stories still documents its props/description.
        if entries.is_empty() {
            entries.push(StoryEntry {
                title: Some(title.clone()),
                name: Some("Default".to_string()),
                entry_type: Some("story".to_string()),
                import_path: import_path.clone(),
                parameters: Some(Parameters {
                    docs: Some(DocsParameters {
                        description: Some(DocsDescription {
                            component: component.description.clone(),
                            story: None,
                        }),
                        source: None,
                    }),
                }),
                ..Default::default()
            });
        }

        if let Some(props) = component.props {
            entries[0].component_info = Some(ComponentInfo { props: Some(props) });
        }

        groups.push(ComponentGroup { title, entries });
    }

    groups
}
