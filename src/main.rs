//! Lectern - Entry Point

use clap::{Parser, Subcommand};
use lectern::commands::{highlight_json, parse_locator, run_session};
use lectern::model::AppError;
use lectern::search::MatchLocator;
use std::path::PathBuf;
use tracing::info;

/// Lectern - navigation and session state engine for a text library
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version)]
#[command(about = "Highlight search matches and restore reading sessions")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the highlight ranges of a query in a text as JSON
    Highlight {
        /// Text to search
        #[arg(long)]
        text: String,

        /// Search query (at least two characters after trimming)
        #[arg(long)]
        query: String,

        /// Current match as START:LEN, in characters
        #[arg(long, value_parser = parse_locator)]
        current: Option<MatchLocator>,
    },

    /// Restore the saved session against a store fixture, print it, and save it back
    Session {
        /// JSON store fixture to serve the library from
        #[arg(long)]
        store: PathBuf,

        /// Session file (overrides the configured one)
        #[arg(long)]
        session: Option<PathBuf>,

        /// Neither read nor write the session file
        #[arg(long)]
        no_persist: bool,
    },
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let (persist_override, session_override) = match &args.command {
        Command::Session {
            session,
            no_persist,
            ..
        } => (no_persist.then_some(false), session.clone()),
        Command::Highlight { .. } => (None, None),
    };
    let config = lectern::config::resolve(args.config.clone(), persist_override, session_override)?;

    let _log = lectern::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    match args.command {
        Command::Highlight {
            text,
            query,
            current,
        } => {
            println!("{}", highlight_json(&text, &query, current)?);
        }
        Command::Session { store, .. } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let report = runtime.block_on(run_session(&store, &config))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
