/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when resolving articles.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The source has no article with this title.
    #[error("article not found: \"{0}\"")]
    NotFound(String),

    /// A link graph document could not be parsed.
    #[error("invalid link graph: {0}")]
    InvalidGraph(#[from] serde_json::Error),

    /// Reading a link graph from disk failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A link graph needs at least this many articles for the request.
    #[error("link graph has {found} article(s), need at least {needed}")]
    TooFewArticles {
        /// Articles present in the graph.
        found: usize,
        /// Articles required.
        needed: usize,
    },
}
