//! Command resolution and navigation engine for Wikiwander.
//!
//! A line of player input goes through [`CommandResolver`] (shorthand codes
//! or free text classified into an [`Intent`](wk_core::Intent)), then
//! [`ArgumentExtractor`] pulls out its title or page count, and finally
//! [`NavigationSession`] validates the move against the current article's
//! links, falling back to [`FuzzyMatcher`] for near misses that the player
//! must confirm.
//!
//! [`GameSession`] wires all of this together with the display commands
//! (history, links, similar, entities, generate) behind a single
//! [`GameSession::process`] call per input line.

/// Engine configuration and policies.
pub mod config;
/// Error types for the engine.
pub mod error;
/// Free-text argument extraction.
pub mod extract;
/// Approximate title matching.
pub mod fuzzy;
/// Playable game wrapping a navigation session.
pub mod game;
/// Input line to command resolution.
pub mod resolver;
/// Navigation state and move legality.
pub mod session;

pub use config::{BackCountPolicy, EngineConfig, GeneratorConfig, LowConfidencePolicy};
pub use error::{EngineError, EngineResult};
pub use extract::{Argument, ArgumentExtractor, back_count};
pub use fuzzy::{FuzzyMatch, FuzzyMatcher};
pub use game::{Capabilities, GameSession, GameStatus, Response, View};
pub use resolver::{CommandResolver, CommandSource, ResolvedCommand};
pub use session::{
    Confirmation, MoveOutcome, NavigationSession, PendingCorrection, Standing, Visit,
};
