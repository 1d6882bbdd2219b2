mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ecue::config::EcueConfig;

#[derive(Parser)]
#[command(name = "ecue", version, about = "Spaced-repetition emotion drills and a plain-file journal")]
struct Cli {
    /// Config file (default: ~/.ecue/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Review flashcards from cards.json
    Learn,
    /// Drill emotion vocabulary and the feelings wheel
    Practice {
        /// Variants to drill, comma-separated ids or numbers (prompted when omitted)
        #[arg(long)]
        variants: Option<String>,
    },
    /// Show review statistics for both decks
    Stats,
    /// Validate every content file
    Check,
    /// Write and inspect journal entries
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },
}

#[derive(Subcommand)]
enum JournalAction {
    /// Write a new entry on stdin; type 'save' to keep it
    Write,
    /// List entries, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Print one entry as JSON
    Show { id: String },
    /// Attach an analysis parsed from model output on stdin
    Analyze { id: String },
    /// Recompute word totals and streaks
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EcueConfig::load_from(path)?,
        None => EcueConfig::load()?,
    };

    // Log to stderr so stdout stays the interactive surface.
    let filter = EnvFilter::try_new(&config.logging.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Learn => cli::learn::learn(&config)?,
        Command::Practice { variants } => cli::practice::practice(&config, variants.as_deref())?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Check => cli::check::check(&config)?,
        Command::Journal { action } => match action {
            JournalAction::Write => cli::journal::write(&config)?,
            JournalAction::List { limit } => cli::journal::list(&config, limit)?,
            JournalAction::Show { id } => cli::journal::show(&config, &id)?,
            JournalAction::Analyze { id } => cli::journal::analyze(&config, &id)?,
            JournalAction::Stats => cli::journal::stats(&config)?,
        },
    }

    Ok(())
}
