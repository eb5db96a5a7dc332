//! Error types for the draw engine

use thiserror::Error;

/// Main error type for the engine
///
/// These are contract violations and setup failures. Problems a player can fix
/// (bad brush parameters, denied blocks, undo overflow) are reported to the
/// player as messages instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{operation} expects {expected} marks, got {actual}")]
    WrongMarkCount {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0}: a brush must be assigned before prepare")]
    MissingBrush(&'static str),

    #[error("{0}: operation was not prepared")]
    NotPrepared(&'static str),

    #[error("Invalid map size {0}x{1}x{2}")]
    InvalidMapSize(i32, i32, i32),

    #[error("Brush name or alias \"{0}\" is already registered")]
    BrushNameConflict(String),
}
