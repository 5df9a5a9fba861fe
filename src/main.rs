//! storydoc — generate markdown documentation from a Storybook story catalog.
//!
//! Pipeline stages, strictly sequential:
//!
//! 1. load the catalog (`storybook-static/stories.json` or `index.json`)
//! 2. enrich every component/story with descriptions and source snippets
//! 3. scan `src/stories` for hook stories the catalog omitted
//! 4. render one markdown file per component plus a category index
//! 5. optionally mirror the output to an R2 bucket (`--upload`)

mod catalog;
mod extract;
mod hooks;
mod model;
mod publish;
mod render;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use model::{ComponentRecord, GeneratedFile};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "storydoc",
    about = "Generate markdown documentation from a Storybook story catalog"
)]
struct Cli {
    /// Project root containing storybook-static/ and src/stories/
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output directory for generated markdown (default: <root>/docs)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Upload generated files to the configured R2 bucket
    #[arg(short = 'u', long)]
    upload: bool,

    /// Unrecognized trailing arguments are accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    _ignored: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(known_args(std::env::args()));
    run(&cli)
}

/// Drop unrecognized flags before parsing. Stray flags from wrapper tooling
/// are ignored wherever they appear, leading or trailing.
fn known_args(args: impl Iterator<Item = String>) -> Vec<String> {
    const KNOWN_FLAGS: &[&str] = &["-o", "--output-dir", "-u", "--upload", "-h", "--help"];
    args.filter(|arg| {
        !arg.starts_with('-')
            || KNOWN_FLAGS.contains(&arg.as_str())
            || arg.starts_with("--output-dir=")
    })
    .collect()
}

fn run(cli: &Cli) -> Result<()> {
    let root = cli.root.clone();
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| root.join("docs"));

    let catalog_dir = root.join("storybook-static");
    let catalog = catalog::load(&catalog_dir)?;

    let storybook_url = std::env::var("STORYBOOK_URL").ok();

    let mut enricher = extract::Enricher::new(root.clone());
    let mut records: Vec<ComponentRecord> = catalog
        .groups
        .iter()
        .map(|group| enricher.enrich_group(group, storybook_url.as_deref()))
        .collect();

    hooks::scan(
        &root,
        &mut records,
        &catalog.entries,
        &mut enricher,
        storybook_url.as_deref(),
    );

    let generated = write_output(&records, &output_dir)?;

    let categories: std::collections::BTreeSet<&str> = generated
        .iter()
        .map(|g| render::category_name(&g.component))
        .collect();
    println!(
        "Generated {} component file(s) across {} categorie(s) in {}",
        generated.len(),
        categories.len(),
        output_dir.display()
    );

    if cli.upload {
        let config = publish::R2Config::from_env()?;
        publish::publish(&config, &output_dir, None)?;
        println!("Upload complete: r2://{}", config.bucket);
    }

    Ok(())
}

/// Render and write one file per component plus the README.md index.
/// One timestamp covers the whole run so reruns differ only by it.
fn write_output(records: &[ComponentRecord], output_dir: &Path) -> Result<Vec<GeneratedFile>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let timestamp = Utc::now().to_rfc3339();
    let mut generated = Vec::new();

    for record in records {
        let relative_path = render::output_rel_path(&record.title);
        let filepath = output_dir.join(&relative_path);
        if let Some(parent) = filepath.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let document = render::component::render(record, &timestamp);
        fs::write(&filepath, document)
            .with_context(|| format!("failed to write {}", filepath.display()))?;
        println!("Generated {}", relative_path);

        generated.push(GeneratedFile {
            relative_path,
            component: record.title.clone(),
        });
    }

    let index_path = output_dir.join("README.md");
    fs::write(&index_path, render::index::render(records, &timestamp))
        .with_context(|| format!("failed to write {}", index_path.display()))?;
    println!("Generated README.md");

    Ok(generated)
}
