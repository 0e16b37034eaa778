//! Command-line front end for the notes core.
//!
//! # Responsibility
//! - Stand in for the list/edit screens: render previews, forward
//!   add/edit/delete requests to `NotesRepository`.
//! - Resolve notes by id, never by content.
//! - Turn store failures reported by the repository into a non-zero exit.

use clap::{Parser, Subcommand};
use quicksnap_core::{
    core_version, derive_note_preview, init_logging, ping, CoreConfig, Note, NoteId,
    NoteStoreFailure, NotesRepository, SqliteNoteStore,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::broadcast::{self, error::TryRecvError};

const EMPTY_LIST_MESSAGE: &str = "(no notes yet)";

#[derive(Parser, Debug)]
#[command(name = "quicksnap", version, about = "Quick personal notes")]
struct Cli {
    /// Notes database file (overrides QUICKSNAP_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every note as title and body preview.
    List {
        /// Print notes as JSON instead of previews.
        #[arg(long)]
        json: bool,
    },
    /// Create a note. Blank text is ignored.
    Add { text: String },
    /// Replace the text of a note.
    Edit { id: NoteId, text: String },
    /// Delete a note.
    Delete { id: NoteId },
    /// Check core linkage.
    Ping,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("quicksnap_core ping={}", ping());
        println!("quicksnap_core version={}", core_version());
        return Ok(());
    }

    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(config.log_level, &log_dir.to_string_lossy())?;
    }

    let store = SqliteNoteStore::open(&config.db_path)
        .map_err(|err| format!("cannot open `{}`: {err}", config.db_path.display()))?;
    let repo = NotesRepository::spawn(store);
    let mut failures = repo.subscribe_failures();

    let outcome = match settle(&repo, &mut failures).await {
        Ok(()) => execute(&repo, &mut failures, cli.command).await,
        Err(err) => Err(err),
    };
    repo.shutdown().await;
    outcome
}

async fn execute(
    repo: &NotesRepository,
    failures: &mut broadcast::Receiver<NoteStoreFailure>,
    command: Command,
) -> Result<(), String> {
    match command {
        Command::List { json } => {
            let notes = repo.current_notes();
            if json {
                println!("{}", render_json(&notes)?);
            } else {
                print!("{}", render_previews(&notes));
            }
        }
        Command::Add { text } => {
            repo.add_note(text);
            settle(repo, failures).await?;
            print!("{}", render_previews(&repo.current_notes()));
        }
        Command::Edit { id, text } => {
            let note = find_note(&repo.current_notes(), id)?;
            repo.update_note(&note, text);
            settle(repo, failures).await?;
        }
        Command::Delete { id } => {
            let note = find_note(&repo.current_notes(), id)?;
            repo.delete_note(&note);
            settle(repo, failures).await?;
        }
        Command::Ping => {}
    }
    Ok(())
}

/// Waits for queued requests and fails when the store reported anything.
async fn settle(
    repo: &NotesRepository,
    failures: &mut broadcast::Receiver<NoteStoreFailure>,
) -> Result<(), String> {
    repo.settled().await;
    collect_failures(failures)
}

fn collect_failures(failures: &mut broadcast::Receiver<NoteStoreFailure>) -> Result<(), String> {
    let mut reported = Vec::new();
    loop {
        match failures.try_recv() {
            Ok(failure) => reported.push(failure.to_string()),
            Err(TryRecvError::Lagged(skipped)) => {
                reported.push(format!("{skipped} more store failures"))
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    if reported.is_empty() {
        Ok(())
    } else {
        Err(reported.join("; "))
    }
}

fn find_note(notes: &[Note], id: NoteId) -> Result<Note, String> {
    notes
        .iter()
        .find(|note| note.id == id)
        .cloned()
        .ok_or_else(|| format!("note {id} not found"))
}

fn render_json(notes: &[Note]) -> Result<String, String> {
    serde_json::to_string_pretty(notes).map_err(|err| err.to_string())
}

fn render_previews(notes: &[Note]) -> String {
    if notes.is_empty() {
        return format!("{EMPTY_LIST_MESSAGE}\n");
    }
    let mut out = String::new();
    for note in notes {
        let preview = derive_note_preview(&note.content);
        out.push_str(&format!("#{} {}\n", note.id, preview.title));
        if preview.has_body() {
            out.push_str(&format!("    {}\n", preview.body));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{collect_failures, find_note, render_json, render_previews};
    use quicksnap_core::{Note, NoteOperation, NoteStoreFailure};
    use tokio::sync::broadcast;

    #[test]
    fn empty_list_renders_placeholder() {
        assert_eq!(render_previews(&[]), "(no notes yet)\n");
    }

    #[test]
    fn previews_show_id_title_and_indented_body() {
        let notes = vec![
            Note::new(1, "Buy milk"),
            Note::new(2, "Call mom about the weekend"),
        ];
        assert_eq!(
            render_previews(&notes),
            "#1 Buy milk\n#2 Call mom\n    about the weekend\n"
        );
    }

    #[test]
    fn json_lists_ids_and_content() {
        let rendered = render_json(&[Note::new(3, "hello")]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["id"], 3);
        assert_eq!(parsed[0]["content"], "hello");
    }

    #[test]
    fn unknown_id_is_an_error() {
        let notes = vec![Note::new(1, "x")];
        assert_eq!(find_note(&notes, 1).unwrap(), notes[0]);
        assert_eq!(find_note(&notes, 9).unwrap_err(), "note 9 not found");
    }

    #[test]
    fn reported_failures_become_an_error() {
        let (sender, mut failures) = broadcast::channel(4);
        assert!(collect_failures(&mut failures).is_ok());

        sender
            .send(NoteStoreFailure {
                operation: NoteOperation::Load,
                note_id: Some(2),
                message: "bad row".to_string(),
            })
            .unwrap();
        let err = collect_failures(&mut failures).unwrap_err();
        assert_eq!(err, "load failed for note 2: bad row");
        assert!(collect_failures(&mut failures).is_ok());
    }
}
