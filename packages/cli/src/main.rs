mod commands;

use clap::{Parser, Subcommand};
use commands::{export_html, progress, validate, ExportHtmlArgs, ProgressArgs, ValidateArgs};

/// Lessonform CLI - inspect and convert lesson documents
#[derive(Parser, Debug)]
#[command(name = "lessonform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check lesson files for malformed or dropped content
    Validate(ValidateArgs),

    /// Export a lesson document to HTML
    ExportHtml(ExportHtmlArgs),

    /// Report playback progress for a lesson and a progress map
    Progress(ProgressArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => validate::run(args),
        Command::ExportHtml(args) => export_html::run(args),
        Command::Progress(args) => progress::run(args),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
