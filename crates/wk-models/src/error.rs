//! Error types for model loading and training.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while loading, training, or running a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A line of a data file could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// A training sample names a label outside the intent set.
    #[error("line {line}: unknown intent label \"{label}\"")]
    UnknownLabel {
        /// One-based line number.
        line: usize,
        /// The offending label.
        label: String,
    },

    /// Training was attempted with no samples.
    #[error("no training samples")]
    EmptyTrainingSet,

    /// The generator has nothing to continue from.
    #[error("generator has no data for this prompt")]
    NoData,

    /// A built-in pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Model (de)serialization failed.
    #[error("model format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a model file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
