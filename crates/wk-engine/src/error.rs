//! Error types for the navigation engine.

use thiserror::Error;
use wk_core::{CoreError, Intent};
use wk_models::ModelError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while resolving or applying a command.
///
/// All of these are local to one command: the session is left unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input line was blank.
    #[error("empty command")]
    EmptyCommand,

    /// No extraction rule produced an argument.
    #[error("could not understand the command: {0}")]
    ExtractionFailure(String),

    /// A numeric or title argument was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The classifier was not confident enough to act on.
    #[error("could not understand the command (best guess {intent} at {:.0}%)", .confidence * 100.0)]
    Unrecognized {
        /// The original input.
        input: String,
        /// The classifier's best guess.
        intent: Intent,
        /// The classifier's confidence.
        confidence: f64,
    },

    /// The article source could not resolve a title.
    #[error("{0}")]
    SourceUnavailable(#[from] CoreError),

    /// A model capability failed.
    #[error("{0}")]
    Model(#[from] ModelError),

    /// A confirmation answer arrived with no correction pending.
    #[error("there is no correction waiting for confirmation")]
    NoPendingCorrection,

    /// The game has already been won, lost, or quit.
    #[error("the game is over")]
    GameOver,

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Reading the configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
