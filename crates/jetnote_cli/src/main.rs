//! JetNote command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and wire the notes stack.
//! - Map subcommands to view-state intents and print the displayed list.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use jetnote_core::{
    format_entry_date, init_logging, sample_notes, CoreConfig, Note, NoteId, NoteSnapshot,
    NotesApp, StoreResult,
};
use log::info;
use std::path::PathBuf;
use tokio::task::JoinHandle;

#[derive(Parser)]
#[command(name = "jetnote", version, about = "Local notes backed by SQLite")]
struct Cli {
    /// Database file (overrides JETNOTE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides JETNOTE_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory (overrides JETNOTE_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a note; title and description may hold letters and whitespace only
    Add {
        #[arg(short = 'T', long)]
        title: String,
        #[arg(short, long)]
        description: String,
    },
    /// Print every stored note
    List {
        /// Print JSON instead of rows
        #[arg(short, long)]
        json: bool,
    },
    /// Delete one note by id
    Delete { id: NoteId },
    /// Delete every note
    Clear,
    /// Insert the sample notes
    Seed,
    /// Print the displayed list each time it changes, until Ctrl-C
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(&config.logging).context("failed to initialize logging")?;

    let app = NotesApp::open(&config)
        .await
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let outcome = run(&app, cli.command).await;
    app.shutdown().await;
    outcome
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.log_dir = dir.clone();
    }
    Ok(config)
}

async fn run(app: &NotesApp, command: Command) -> Result<()> {
    let view_state = &app.view_state;
    match command {
        Command::Add { title, description } => {
            let note = Note::try_new(title.trim(), description.trim())?;
            let id = note.id();
            settle(view_state.add_note(note)).await?;
            println!("Note added: {id}");
        }
        Command::List { json } => {
            let notes = app
                .repository
                .get_notes()
                .next()
                .await
                .ok_or_else(|| anyhow!("live query closed"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(notes.as_slice())?);
            } else {
                print_rows(&notes);
            }
        }
        Command::Delete { id } => {
            let note = app.repository.get_note(id).await?;
            settle(view_state.delete_note(note)).await?;
            println!("Note deleted: {id}");
        }
        Command::Clear => {
            settle(view_state.delete_all_notes()).await?;
            println!("All notes deleted.");
        }
        Command::Seed => {
            let handles: Vec<_> = sample_notes()
                .into_iter()
                .map(|note| view_state.add_note(note))
                .collect();
            let count = handles.len();
            for handle in handles {
                settle(handle).await?;
            }
            println!("Inserted {count} sample notes.");
        }
        Command::Watch => {
            let mut displayed = view_state.notes();
            info!("event=watch_start module=cli");
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = displayed.changed() => {
                        changed?;
                        let notes = displayed.borrow_and_update().clone();
                        println!("--- {} note(s)", notes.len());
                        print_rows(&notes);
                    }
                }
            }
        }
    }
    Ok(())
}

async fn settle(handle: JoinHandle<StoreResult<()>>) -> Result<()> {
    handle
        .await
        .map_err(|err| anyhow!("note task failed: {err}"))?
        .map_err(Into::into)
}

fn print_rows(notes: &NoteSnapshot) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }
    for note in notes {
        println!(
            "{}  {}  {}\n    {}",
            note.id(),
            format_entry_date(&note.entry_date()),
            note.title(),
            note.description()
        );
    }
}
