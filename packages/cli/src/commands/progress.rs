use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lessonform_nodes::NodeRegistry;
use lessonform_progress::{parse_or_default, PlaybackSession, ProgressMap, RevealMode, SessionState};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ProgressArgs {
    /// Lesson .json file
    pub lesson: PathBuf,

    /// Progress map .json file (uuid → recorded outcome); empty when omitted
    #[arg(short, long)]
    pub map: Option<PathBuf>,

    /// Reveal mode to evaluate under
    #[arg(short, long, value_enum, default_value_t = RevealModeArg::Progressive)]
    pub reveal: RevealModeArg,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealModeArg {
    Progressive,
    All,
    Linear,
}

impl From<RevealModeArg> for RevealMode {
    fn from(arg: RevealModeArg) -> Self {
        match arg {
            RevealModeArg::Progressive => RevealMode::Progressive,
            RevealModeArg::All => RevealMode::All,
            RevealModeArg::Linear => RevealMode::Linear,
        }
    }
}

pub fn run(args: ProgressArgs) -> Result<()> {
    let content = fs::read_to_string(&args.lesson)?;
    let registry = NodeRegistry::with_defaults();
    let (document, _) = parse_or_default(&registry, &content);

    let map = match &args.map {
        Some(path) => serde_json::from_str::<ProgressMap>(&fs::read_to_string(path)?)?,
        None => ProgressMap::new(),
    };

    let total_children = document.children().len();
    let mut session = PlaybackSession::new(document, args.reveal.into());
    let state = session.sync(&map);

    println!("📊 {} {}", "Progress for".green().bold(), args.lesson.display());
    println!();
    println!("   State:      {}", state_label(state));
    println!("   Completion: {}%", session.completion_percentage(&map));
    println!(
        "   Revealed:   {} of {} top-level block(s)",
        session.reveal_window(&map).len(),
        total_children
    );
    println!(
        "   Tracked:    {} played of {}",
        session
            .document()
            .tracked_nodes()
            .filter(|node| node.uuid().map(|uuid| map.contains(uuid)).unwrap_or(false))
            .count(),
        session.document().tracked_nodes().count()
    );
    if session.is_forward_gated(&map) {
        println!("   Navigation: {}", "gated".yellow());
    }

    Ok(())
}

fn state_label(state: SessionState) -> String {
    match state {
        SessionState::NotStarted => "not started".dimmed().to_string(),
        SessionState::InProgress => "in progress".yellow().to_string(),
        SessionState::AwaitingCompletion => "awaiting completion".cyan().to_string(),
        SessionState::Completed => "completed".green().to_string(),
    }
}
