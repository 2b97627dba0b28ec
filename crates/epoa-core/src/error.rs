use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before or while rows are processed.
#[derive(Debug, Error)]
pub enum EpoaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("spreadsheet read error: {0}")]
    SpreadsheetRead(String),

    #[error(
        "rows {first_row} and {second_row} both resolve to evidence directory {}",
        .directory.display()
    )]
    PathCollision {
        first_row: usize,
        second_row: usize,
        directory: PathBuf,
    },
}

/// Renderer failure for a single row. Never propagated past the orchestrator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("failed to start renderer: {0}")]
    Spawn(String),
    #[error("renderer exited with {status}: {detail}")]
    ExitStatus { status: String, detail: String },
    #[error("renderer timed out after {0}s")]
    Timeout(u64),
    #[error("renderer produced no output at {0}")]
    MissingOutput(String),
    #[error("could not prepare evidence directory: {0}")]
    Io(String),
}

/// Posting PDF that yielded no text to check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnreadablePdfError {
    #[error("cannot open posting pdf: {0}")]
    Corrupt(String),
    #[error("posting pdf is encrypted")]
    Encrypted,
    #[error("posting pdf contains no extractable text")]
    NoText,
}
