use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lessonform_common::collect_uuids;
use lessonform_nodes::{import_document, DocumentIntegrity, NodeRegistry};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Lesson .json file or directory to check
    pub input: PathBuf,

    /// Emit the integrity report as JSON instead of text
    #[arg(short, long)]
    pub json: bool,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    if !args.json {
        println!("🔍 {} Lessonform Validator", "Starting".green().bold());
        println!("   Input: {}", args.input.display());
        println!();
    }

    let files = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        find_lesson_files(&args.input)
    } else {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            args.input.display()
        ));
    };

    let registry = NodeRegistry::with_defaults();
    let mut dirty_files = 0;

    for file in &files {
        let integrity = validate_file(&registry, file, args.json)?;
        if !integrity.is_clean() {
            dirty_files += 1;
        }
    }

    if !args.json {
        println!();
        if dirty_files == 0 {
            println!(
                "✅ {} {} file(s), all clean",
                "Checked".green().bold(),
                files.len()
            );
        } else {
            println!(
                "⚠️  {} {} of {} file(s) recovered content",
                "Checked".yellow().bold(),
                dirty_files,
                files.len()
            );
        }
    }

    Ok(())
}

fn validate_file(
    registry: &NodeRegistry,
    path: &Path,
    as_json: bool,
) -> Result<DocumentIntegrity> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|err| anyhow::anyhow!("{}: invalid JSON: {}", path.display(), err))?;
    let (document, integrity) = import_document(registry, &value)
        .map_err(|err| anyhow::anyhow!("{}: {}", path.display(), err))?;

    let uuids = collect_uuids(&document);
    let unique: HashSet<_> = uuids.iter().collect();
    if unique.len() != uuids.len() {
        return Err(anyhow::anyhow!(
            "{}: document contains duplicate node uuids",
            path.display()
        ));
    }

    if as_json {
        let report = serde_json::json!({
            "file": path.display().to_string(),
            "blocks": document.block_count(),
            "tracked": document.tracked_nodes().count(),
            "droppedMatchItems": integrity.dropped_match_items,
            "malformedNodes": integrity.malformed_nodes,
            "untypedNodes": integrity.untyped_nodes,
        });
        println!("{}", serde_json::to_string(&report)?);
    } else if integrity.is_clean() {
        println!("   {} {}", "ok".green(), path.display());
    } else {
        println!(
            "   {} {} (dropped items: {}, malformed: {}, untyped: {})",
            "recovered".yellow(),
            path.display(),
            integrity.dropped_match_items,
            integrity.malformed_nodes,
            integrity.untyped_nodes
        );
    }

    Ok(integrity)
}

fn find_lesson_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().map(|ext| ext == "json").unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}
