use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lessonform_html::{export_dom, render_html, DomElement, RenderOptions};
use lessonform_nodes::{import_document, NodeRegistry};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportHtmlArgs {
    /// Lesson .json file to export
    pub input: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Indented output
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn run(args: ExportHtmlArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let registry = NodeRegistry::with_defaults();
    let (document, integrity) = import_document(&registry, &value)?;

    if !integrity.is_clean() {
        eprintln!(
            "⚠️  {} recovered content while importing (dropped items: {}, malformed: {}, untyped: {})",
            "Warning:".yellow().bold(),
            integrity.dropped_match_items,
            integrity.malformed_nodes,
            integrity.untyped_nodes
        );
    }

    let mut wrapper = DomElement::new("div").with_attr("class", "lesson");
    for node in document.children() {
        wrapper = wrapper.with_child(export_dom(node)?);
    }

    let options = RenderOptions {
        pretty: args.pretty,
        ..RenderOptions::default()
    };
    let html = render_html(&wrapper, options);

    match &args.output {
        Some(path) => {
            fs::write(path, &html)?;
            println!(
                "✅ {} {} → {}",
                "Exported".green().bold(),
                args.input.display(),
                path.display()
            );
        }
        None => println!("{}", html),
    }

    Ok(())
}
