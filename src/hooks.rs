//! Hook fallback scanner.
//!
//! Catalogs built from a flat story list sometimes omit hook stories (an
//! upstream grouping defect). This stage scans `src/stories` for
//! `Use*.stories.*` files and synthesizes component records for any hook
//! title the catalog missed.

use crate::extract::{snippet, Enricher};
use crate::model::{ComponentRecord, EnrichedStory, StoryEntry};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"title:\s*(?:'([^']+)'|"([^"]+)"|`([^`]+)`)"#).unwrap()
});

static RE_STORY_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+const\s+([A-Za-z_$][\w$]*)\s*:\s*Story\s*=").unwrap()
});

/// Scan for hook story files the catalog omitted and append synthesized
/// records. Titles already present are never re-added.
pub fn scan(
    root: &Path,
    records: &mut Vec<ComponentRecord>,
    catalog_entries: &[StoryEntry],
    enricher: &mut Enricher,
    storybook_url: Option<&str>,
) {
    let pattern = root.join("src/stories/Use*.stories.*");
    let Some(pattern) = pattern.to_str() else {
        return;
    };

    let mut paths: Vec<_> = match glob::glob(pattern) {
        Ok(matches) => matches.filter_map(|r| r.ok()).filter(|p| p.is_file()).collect(),
        Err(_) => return,
    };
    paths.sort();

    for path in paths {
        let Ok(text) = std::fs::read_to_string(&path) else {
            eprintln!("warning: skipping unreadable hook story {}", path.display());
            continue;
        };

        let Some(title) = file_title(&text) else {
            continue;
        };
        if !title.starts_with("Hooks/") {
            continue;
        }
        if records.iter().any(|r| r.title == title) {
            continue;
        }

        let import_path = relative_import_path(root, &path);
        let record = synthesize_record(
            &title,
            &import_path,
            &text,
            catalog_entries,
            enricher,
            storybook_url,
        );
        records.push(record);
    }
}

fn synthesize_record(
    title: &str,
    import_path: &str,
    text: &str,
    catalog_entries: &[StoryEntry],
    enricher: &mut Enricher,
    storybook_url: Option<&str>,
) -> ComponentRecord {
    let file_entry = StoryEntry {
        title: Some(title.to_string()),
        import_path: Some(import_path.to_string()),
        ..Default::default()
    };

    let description = enricher
        .resolve_story_file(import_path)
        .and_then(|t| crate::extract::describe::component_description(&t));

    let mut stories: Vec<EnrichedStory> = RE_STORY_EXPORT
        .captures_iter(text)
        .map(|caps| {
            let name = caps[1].to_string();
            EnrichedStory {
                id: lookup_story_id(catalog_entries, title, &name),
                description: enricher.story_description(&name, &file_entry),
                source: snippet::extract(text, &name),
                name,
            }
        })
        .collect();

    // A hook file with no story exports still gets one documented entry.
    if stories.is_empty() {
        let hook_name = title.strip_prefix("Hooks/").unwrap_or(title);
        stories.push(EnrichedStory {
            id: lookup_story_id(catalog_entries, title, "Default"),
            name: "Default".to_string(),
            description: format!("Default usage of {}", hook_name),
            source: None,
        });
    }

    ComponentRecord {
        title: title.to_string(),
        description,
        props: Default::default(),
        stories,
        storybook_url: storybook_url.map(str::to_string),
        import_path: Some(import_path.to_string()),
    }
}

/// Catalog id for `(title, name)`, used for documentation-site deep links.
fn lookup_story_id(entries: &[StoryEntry], title: &str, name: &str) -> Option<String> {
    entries
        .iter()
        .find(|e| e.title.as_deref() == Some(title) && e.name.as_deref() == Some(name))
        .and_then(|e| e.id.clone())
}

fn file_title(text: &str) -> Option<String> {
    let caps = RE_TITLE.captures(text)?;
    (1..caps.len())
        .filter_map(|i| caps.get(i))
        .map(|m| m.as_str().to_string())
        .next()
}

/// On-disk path relative to the project root, slash-separated.
fn relative_import_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_hook_story(root: &Path, name: &str, contents: &str) {
        let dir = root.join("src/stories");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn synthesizes_missing_hook_record() {
        let dir = tempfile::TempDir::new().unwrap();
        write_hook_story(
            dir.path(),
            "UseBoolean.stories.tsx",
            "\
const meta = {
  title: 'Hooks/UseBoolean',
  parameters: { docs: { description: { component: 'Boolean state hook.' } } },
};

export const Default: Story = { render: () => <UseBooleanDemo /> };
export const Toggled: Story = { args: {} };
",
        );

        let mut records = Vec::new();
        let mut enricher = Enricher::new(dir.path().to_path_buf());
        scan(dir.path(), &mut records, &[], &mut enricher, None);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Hooks/UseBoolean");
        assert_eq!(record.description.as_deref(), Some("Boolean state hook."));
        assert_eq!(record.stories.len(), 2);
        assert_eq!(record.stories[0].name, "Default");
        assert_eq!(
            record.stories[0].source.as_deref(),
            Some("() => <UseBooleanDemo />")
        );
        assert_eq!(record.stories[1].name, "Toggled");
        assert_eq!(record.stories[1].source, None);
    }

    #[test]
    fn existing_title_never_duplicated() {
        let dir = tempfile::TempDir::new().unwrap();
        write_hook_story(
            dir.path(),
            "UseBoolean.stories.tsx",
            "const meta = { title: 'Hooks/UseBoolean' };\nexport const Default: Story = {};\n",
        );

        let mut records = vec![ComponentRecord {
            title: "Hooks/UseBoolean".to_string(),
            ..Default::default()
        }];
        let mut enricher = Enricher::new(dir.path().to_path_buf());
        scan(dir.path(), &mut records, &[], &mut enricher, None);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn non_hook_titles_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        write_hook_story(
            dir.path(),
            "UserCard.stories.tsx",
            "const meta = { title: 'Display/UserCard' };\n",
        );

        let mut records = Vec::new();
        let mut enricher = Enricher::new(dir.path().to_path_buf());
        scan(dir.path(), &mut records, &[], &mut enricher, None);
        assert!(records.is_empty());
    }

    #[test]
    fn zero_exports_get_a_default_story() {
        let dir = tempfile::TempDir::new().unwrap();
        write_hook_story(
            dir.path(),
            "UseDebounce.stories.ts",
            "const meta = { title: 'Hooks/UseDebounce' };\nexport default meta;\n",
        );

        let mut records = Vec::new();
        let mut enricher = Enricher::new(dir.path().to_path_buf());
        scan(dir.path(), &mut records, &[], &mut enricher, None);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stories.len(), 1);
        assert_eq!(records[0].stories[0].name, "Default");
        assert_eq!(
            records[0].stories[0].description,
            "Default usage of UseDebounce"
        );
        assert_eq!(records[0].stories[0].source, None);
    }

    #[test]
    fn story_ids_resolved_from_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        write_hook_story(
            dir.path(),
            "UseClipboard.stories.tsx",
            "const meta = { title: 'Hooks/UseClipboard' };\nexport const Default: Story = {};\n",
        );

        let entries = vec![StoryEntry {
            id: Some("hooks-useclipboard--default".to_string()),
            title: Some("Hooks/UseClipboard".to_string()),
            name: Some("Default".to_string()),
            ..Default::default()
        }];

        let mut records = Vec::new();
        let mut enricher = Enricher::new(dir.path().to_path_buf());
        scan(dir.path(), &mut records, &entries, &mut enricher, None);
        assert_eq!(
            records[0].stories[0].id.as_deref(),
            Some("hooks-useclipboard--default")
        );
    }

    #[test]
    fn relative_import_path_strips_root() {
        let root = PathBuf::from("/proj");
        let path = PathBuf::from("/proj/src/stories/UseBoolean.stories.tsx");
        assert_eq!(
            relative_import_path(&root, &path),
            "src/stories/UseBoolean.stories.tsx"
        );
    }
}
