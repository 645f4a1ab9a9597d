//! Language model capabilities for Wikiwander.
//!
//! The navigation engine treats every model as a swappable capability behind
//! a trait in [`capability`]. This crate ships one implementation of each:
//! a TF-IDF nearest-centroid intent classifier, a word-vector table, a
//! pattern-based entity tagger, and a Markov-chain text generator.

/// Capability traits the engine depends on.
pub mod capability;
/// TF-IDF nearest-centroid intent classifier.
pub mod classifier;
/// Pattern-based named entity tagger.
pub mod entities;
/// Error types for model loading and training.
pub mod error;
/// Markov-chain text generator.
pub mod markov;
/// Word-vector similarity model.
pub mod vectors;

pub use capability::{
    Classification, EntityHighlighter, EntitySpan, IntentClassifier, SimilarityModel,
    StaticClassifier, TextGenerator, segments,
};
pub use classifier::CentroidClassifier;
pub use entities::PatternHighlighter;
pub use error::{ModelError, ModelResult};
pub use markov::MarkovGenerator;
pub use vectors::WordVectors;
