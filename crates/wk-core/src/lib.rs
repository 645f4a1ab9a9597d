//! Core types for Wikiwander: articles, intents, and the article source.
//!
//! This crate defines the data model the navigation engine works on. It knows
//! nothing about how articles are fetched; [`ArticleSource`] is the boundary
//! an encyclopedia backend implements, and [`LinkGraph`] is an offline
//! implementation backed by a JSON document.

/// Article data as seen by the navigation engine.
pub mod article;
/// Error types used throughout the crate.
pub mod error;
/// The closed set of command intents and their argument kinds.
pub mod intent;
/// Article source boundary and the offline link graph.
pub mod source;
/// Title comparison helpers.
pub mod title;

/// Re-export article types.
pub use article::Article;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export intent types.
pub use intent::{ArgumentKind, Intent};
/// Re-export source types.
pub use source::{ArticleSource, LinkGraph};
/// Re-export title helpers.
pub use title::{normalize_title, titles_eq};
