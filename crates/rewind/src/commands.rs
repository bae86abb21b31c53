//! Command execution against a persisted document history.
//!
//! Each invocation loads the document's history, applies one command,
//! writes the result back if it changed anything, and returns the text to
//! print.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use rewind_history::{
    HistoryConfig, HistoryEngine, HistorySnapshot, IncomingEdit, PersistenceLayer, Render,
};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(flatten)]
    History(HistoryCommand),
    /// List documents with stored history.
    List,
    /// Delete the stored history of the document.
    Forget,
}

/// Commands that load, change, and write back one document's history.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Record an edit: the full buffer content after the change.
    Edit {
        /// Edit kind, e.g. insertText or deleteContentBackward.
        kind: String,
        /// Full buffer content after the edit.
        value: String,
        /// Caret offset after the edit. Defaults to the end of `value`.
        #[arg(long)]
        caret: Option<usize>,
    },
    /// Step back one history record.
    Undo,
    /// Step forward one history record.
    Redo,
    /// Print the current record.
    Show,
    /// Collapse the history to a blank anchor.
    Reset,
    /// Write the history as JSON to a file, or stdout when omitted.
    Export { path: Option<PathBuf> },
    /// Replace the history with a JSON export.
    Import { path: PathBuf },
}

impl HistoryCommand {
    /// Whether the command changes history and must be written back.
    fn mutates(&self) -> bool {
        !matches!(self, Self::Show | Self::Export { .. })
    }
}

/// Runs `command` for `doc_id` and returns what should be printed.
///
/// `now_ms` stamps recorded edits.
pub fn execute(
    command: &Command,
    doc_id: &str,
    config: HistoryConfig,
    layer: &PersistenceLayer,
    now_ms: i64,
) -> Result<String> {
    match command {
        Command::List => Ok(layer.list_documents()?.join("\n")),
        Command::Forget => {
            if layer.delete(doc_id)? {
                Ok(format!("forgot {doc_id}"))
            } else {
                Ok(format!("no history for {doc_id}"))
            }
        }
        Command::History(command) => apply(command, doc_id, config, layer, now_ms),
    }
}

fn apply(
    command: &HistoryCommand,
    doc_id: &str,
    config: HistoryConfig,
    layer: &PersistenceLayer,
    now_ms: i64,
) -> Result<String> {
    let mut engine = HistoryEngine::load_or_new(doc_id, config, layer)?;
    engine.subscribe(|snap: &HistorySnapshot| {
        tracing::debug!(
            len = snap.actions.len(),
            position = snap.position,
            "History changed"
        );
    });

    let output = match command {
        HistoryCommand::Edit { kind, value, caret } => {
            let caret = caret.unwrap_or_else(|| value.chars().count());
            let edit = IncomingEdit::new(kind.as_str(), value.as_str(), now_ms, caret);
            let render = engine.record(edit);
            describe(&engine, &render)
        }
        HistoryCommand::Undo => {
            let render = engine.undo();
            describe(&engine, &render)
        }
        HistoryCommand::Redo => {
            let render = engine.redo();
            describe(&engine, &render)
        }
        HistoryCommand::Show => describe(&engine, &engine.render()),
        HistoryCommand::Reset => {
            engine.reset();
            describe(&engine, &engine.render())
        }
        HistoryCommand::Export { path } => {
            let json = engine.history().to_json()?;
            match path {
                Some(path) => {
                    std::fs::write(path, &json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    let count = engine.actions().len();
                    format!("exported {count} records to {}", path.display())
                }
                None => json,
            }
        }
        HistoryCommand::Import { path } => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let snapshot = HistorySnapshot::from_json(&json)?;
            engine
                .restore(snapshot)
                .with_context(|| format!("Failed to import {}", path.display()))?;
            describe(&engine, &engine.render())
        }
    };

    if command.mutates() {
        engine.flush(doc_id, layer)?;
    }
    Ok(output)
}

/// Status line followed by the buffer content.
fn describe(engine: &HistoryEngine, render: &Render) -> String {
    format!(
        "[{}/{}] caret {}\n{}",
        engine.position(),
        engine.actions().len() - 1,
        render.caret,
        render.value
    )
}
