//! Metadata enricher — fills in descriptions and source snippets for every
//! component and story via strict fallback chains.
//!
//! Resolution failures are never fatal: every step degrades to the next one
//! in its chain, terminating in a generated default (descriptions) or a null
//! value (snippets).

pub mod describe;
pub mod snippet;

use crate::catalog::ComponentGroup;
use crate::model::{ComponentRecord, EnrichedStory, StoryEntry};
use std::collections::HashMap;
use std::path::PathBuf;

/// One enricher per pipeline run. Owns the file-content cache so repeated
/// lookups for the same story file read from disk once; the cache is never
/// invalidated mid-run (source files are assumed immutable for the run).
pub struct Enricher {
    root: PathBuf,
    cache: HashMap<String, Option<String>>,
}

impl Enricher {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            cache: HashMap::new(),
        }
    }

    /// Resolve an import path to file text, trying in order: the path as
    /// given; joined to the project root; the `./`-cleaned path joined to
    /// the root; a separator-normalized variant. Results (including
    /// failures) are cached keyed by the exact candidate string.
    pub fn resolve_story_file(&mut self, import_path: &str) -> Option<String> {
        let cleaned = import_path.trim_start_matches("./");
        let normalized = import_path.replace('\\', "/");
        let normalized_cleaned = normalized.trim_start_matches("./").to_string();

        let candidates = [
            import_path.to_string(),
            self.root.join(import_path).to_string_lossy().into_owned(),
            self.root.join(cleaned).to_string_lossy().into_owned(),
            self.root.join(&normalized_cleaned).to_string_lossy().into_owned(),
        ];

        for candidate in candidates {
            if let Some(cached) = self.cache.get(&candidate) {
                if cached.is_some() {
                    return cached.clone();
                }
                continue;
            }
            // Read errors mean "try the next candidate", not failure.
            let text = std::fs::read_to_string(&candidate).ok();
            self.cache.insert(candidate, text.clone());
            if text.is_some() {
                return text;
            }
        }
        None
    }

    /// Build an enriched [`ComponentRecord`] from one catalog group.
    pub fn enrich_group(
        &mut self,
        group: &ComponentGroup,
        storybook_url: Option<&str>,
    ) -> ComponentRecord {
        let import_path = group
            .entries
            .iter()
            .find_map(|e| e.import_path.clone());

        let description = self.component_description(&group.entries, import_path.as_deref());

        let props = group
            .entries
            .iter()
            .find_map(|e| e.component_info.as_ref().and_then(|i| i.props.clone()))
            .unwrap_or_default();

        let stories = group
            .entries
            .iter()
            .map(|entry| self.enrich_story(entry))
            .collect();

        ComponentRecord {
            title: group.title.clone(),
            description,
            props,
            stories,
            storybook_url: storybook_url.map(str::to_string),
            import_path,
        }
    }

    /// Component description chain: catalog value, then regex extraction
    /// from the source file. Stays null when neither resolves.
    fn component_description(
        &mut self,
        entries: &[StoryEntry],
        import_path: Option<&str>,
    ) -> Option<String> {
        if let Some(authored) = entries.iter().find_map(|e| e.component_description()) {
            return Some(authored.to_string());
        }
        let text = self.resolve_story_file(import_path?)?;
        describe::component_description(&text)
    }

    /// Story description chain: catalog value, source-file extraction,
    /// generated default. Always returns a non-empty string.
    pub fn story_description(&mut self, name: &str, entry: &StoryEntry) -> String {
        if let Some(authored) = entry.story_description() {
            return authored.to_string();
        }
        if let Some(import_path) = entry.import_path.as_deref() {
            if let Some(text) = self.resolve_story_file(import_path) {
                if let Some(found) = describe::story_description(&text, name) {
                    return found;
                }
            }
        }
        describe::default_description(name)
    }

    /// Snippet chain: catalog value, then export-block extraction from the
    /// source file. No default is synthesized for missing snippets.
    pub fn story_snippet(&mut self, name: &str, entry: &StoryEntry) -> Option<String> {
        if let Some(authored) = entry.source_code() {
            return Some(authored.to_string());
        }
        let text = self.resolve_story_file(entry.import_path.as_deref()?)?;
        snippet::extract(&text, name)
    }

    fn enrich_story(&mut self, entry: &StoryEntry) -> EnrichedStory {
        let name = entry.name.clone().unwrap_or_else(|| "Default".to_string());
        let description = self.story_description(&name, entry);
        let source = self.story_snippet(&name, entry);
        EnrichedStory {
            id: entry.id.clone(),
            name,
            description,
            source,
        }
    }
}
