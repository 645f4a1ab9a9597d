//! Navigation session: history, current position, and move legality.

use tracing::{info, warn};
use wk_core::{Article, ArticleSource, titles_eq};

use crate::error::{EngineError, EngineResult};
use crate::fuzzy::FuzzyMatcher;

/// How many near-miss titles to list when a move is rejected.
const SUGGESTION_LIMIT: usize = 5;

/// Where a history entry stands relative to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// A legal page that is not the endpoint.
    OnPath,
    /// The endpoint, or a legal page after it.
    Reached,
    /// A page reached by a losing move, or any page after one.
    Invalid,
}

/// One entry of the history.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    /// The article visited.
    pub article: Article,
    /// How it was reached.
    pub standing: Standing,
}

/// A near-miss title waiting for the player to confirm.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCorrection {
    /// The title the player asked for.
    pub original: String,
    /// The closest link.
    pub suggestion: String,
    /// Similarity between the two.
    pub score: f64,
}

/// The player's answer to a [`PendingCorrection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Use the suggested link.
    Corrected,
    /// Go to the original title anyway. This loses the game.
    Original,
    /// Do nothing.
    Cancel,
}

impl Confirmation {
    /// Parse `y`/`n`/`c` (or `yes`/`no`/`cancel`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Self::Corrected),
            "n" | "no" => Some(Self::Original),
            "c" | "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// The result of a move attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Moved to `title`. `losing` is set when the title was not a link.
    Applied {
        /// Canonical title of the new article.
        title: String,
        /// Whether this move lost the game.
        losing: bool,
    },
    /// Moved to the suggested link instead of a mistyped title.
    AppliedAfterCorrection {
        /// What the player typed.
        original: String,
        /// Where they went.
        corrected: String,
    },
    /// A close link exists; the player must confirm before anything moves.
    NeedsConfirmation(PendingCorrection),
    /// No link is close enough. Nothing moved.
    Rejected {
        /// What the player asked for.
        candidate: String,
        /// Why it was refused.
        reason: String,
        /// Links that loosely resemble the candidate, or every link when
        /// none does.
        suggestions: Vec<String>,
    },
    /// The player cancelled a pending correction.
    Cancelled,
    /// Went back through the history.
    WentBack {
        /// Title now current.
        title: String,
        /// Pages actually moved back.
        steps: usize,
    },
}

/// The state of one game: history, endpoint, and whether a losing move
/// has been made.
///
/// History is truncated when going back; there is no forward history.
pub struct NavigationSession<S> {
    source: S,
    history: Vec<Visit>,
    endpoint: String,
    lost: bool,
    pending: Option<PendingCorrection>,
    matcher: FuzzyMatcher,
}

impl<S: ArticleSource> NavigationSession<S> {
    /// Start a session at `start`, fetched from `source`.
    pub fn new(
        source: S,
        start: &str,
        endpoint: impl Into<String>,
        matcher: FuzzyMatcher,
    ) -> EngineResult<Self> {
        let article = source.fetch(start)?;
        Ok(Self::from_article(source, article, endpoint, matcher))
    }

    /// Start a session at an already-fetched article.
    pub fn from_article(
        source: S,
        start: Article,
        endpoint: impl Into<String>,
        matcher: FuzzyMatcher,
    ) -> Self {
        let endpoint = endpoint.into();
        let standing = if titles_eq(&start.title, &endpoint) {
            Standing::Reached
        } else {
            Standing::OnPath
        };
        Self {
            source,
            history: vec![Visit {
                article: start,
                standing,
            }],
            endpoint,
            lost: false,
            pending: None,
            matcher,
        }
    }

    /// The current article.
    pub fn current(&self) -> &Article {
        // History always holds at least the start article.
        &self.history[self.current_index()].article
    }

    /// Index of the current article in the history.
    pub fn current_index(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Titles visited up to and including the current one.
    pub fn history(&self) -> Vec<&str> {
        self.history
            .iter()
            .map(|v| v.article.title.as_str())
            .collect()
    }

    /// History entries with their standing.
    pub fn visits(&self) -> &[Visit] {
        &self.history
    }

    /// The title to reach.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the current article is the endpoint.
    pub fn has_won(&self) -> bool {
        titles_eq(&self.current().title, &self.endpoint)
    }

    /// Whether a losing move has been confirmed. Never resets.
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Whether the game has ended by win or loss.
    pub fn is_over(&self) -> bool {
        self.lost || self.has_won()
    }

    /// The correction waiting for confirmation, if any.
    pub fn pending(&self) -> Option<&PendingCorrection> {
        self.pending.as_ref()
    }

    /// Number of moves made so far.
    pub fn moves(&self) -> usize {
        self.current_index()
    }

    /// Try to follow a link from the current article.
    ///
    /// Exact links (ignoring case and spacing) move immediately. A close
    /// enough near miss is held as a pending correction for [`Self::confirm`].
    pub fn visit(&mut self, candidate: &str) -> EngineResult<MoveOutcome> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }
        self.pending = None;

        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(EngineError::InvalidArgument("empty title".to_string()));
        }

        if let Some(link) = self.current().find_link(candidate).map(str::to_string) {
            let title = self.advance(&link, false)?;
            return Ok(MoveOutcome::Applied {
                title,
                losing: false,
            });
        }

        let links = &self.current().links;
        match self.matcher.best_match(candidate, links) {
            Some(m) if self.matcher.accepts(&m) => {
                let pending = PendingCorrection {
                    original: candidate.to_string(),
                    suggestion: m.title,
                    score: m.score,
                };
                self.pending = Some(pending.clone());
                Ok(MoveOutcome::NeedsConfirmation(pending))
            }
            _ => {
                let mut suggestions = self.matcher.suggestions(candidate, links, SUGGESTION_LIMIT);
                if suggestions.is_empty() {
                    suggestions = links.clone();
                }
                Ok(MoveOutcome::Rejected {
                    candidate: candidate.to_string(),
                    reason: "no close link".to_string(),
                    suggestions,
                })
            }
        }
    }

    /// Resolve the pending correction.
    pub fn confirm(&mut self, choice: Confirmation) -> EngineResult<MoveOutcome> {
        let pending = self.pending.take().ok_or(EngineError::NoPendingCorrection)?;
        match choice {
            Confirmation::Corrected => {
                let corrected = self.advance(&pending.suggestion, false)?;
                Ok(MoveOutcome::AppliedAfterCorrection {
                    original: pending.original,
                    corrected,
                })
            }
            Confirmation::Original => {
                let title = self.advance(&pending.original, true)?;
                Ok(MoveOutcome::Applied {
                    title,
                    losing: true,
                })
            }
            Confirmation::Cancel => Ok(MoveOutcome::Cancelled),
        }
    }

    /// Go back `n` pages, stopping at the start. Pages gone back past are
    /// dropped from the history.
    pub fn back(&mut self, n: usize) -> EngineResult<MoveOutcome> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }
        if n == 0 {
            return Err(EngineError::InvalidArgument(
                "back needs a positive number of pages".to_string(),
            ));
        }
        self.pending = None;

        let current = self.current_index();
        let target = current.saturating_sub(n);
        self.history.truncate(target + 1);
        Ok(MoveOutcome::WentBack {
            title: self.current().title.clone(),
            steps: current - target,
        })
    }

    fn advance(&mut self, title: &str, losing: bool) -> EngineResult<String> {
        let article = self.source.fetch(title).inspect_err(|e| {
            warn!(title, error = %e, "could not fetch article");
        })?;

        let previous = self.history[self.current_index()].standing;
        let standing = if losing || previous == Standing::Invalid {
            Standing::Invalid
        } else if previous == Standing::Reached || titles_eq(&article.title, &self.endpoint) {
            Standing::Reached
        } else {
            Standing::OnPath
        };

        let title = article.title.clone();
        self.history.push(Visit { article, standing });
        if losing {
            self.lost = true;
            info!(title = %title, "losing move confirmed");
        } else {
            info!(title = %title, moves = self.moves(), "moved");
        }
        Ok(title)
    }
}

#[cfg(test)]
mod tests {
    use wk_core::LinkGraph;

    use super::*;

    fn graph() -> LinkGraph {
        LinkGraph::new()
            .with_article(
                Article::new("Canada").with_links(["Politics of Canada", "Ottawa", "Kanata"]),
            )
            .with_article(Article::new("Politics of Canada").with_links(["Canada", "Parliament of Canada"]))
            .with_article(Article::new("Ottawa").with_links(["Canada", "Rideau Canal"]))
            .with_article(Article::new("Parliament of Canada").with_links(["Ottawa"]))
            .with_article(Article::new("Kanata").with_links(["Ottawa"]))
            .with_article(Article::new("Kanatta"))
    }

    fn session() -> NavigationSession<LinkGraph> {
        NavigationSession::new(graph(), "Canada", "Parliament of Canada", FuzzyMatcher::new(0.8))
            .unwrap()
    }

    #[test]
    fn starts_at_start() {
        let s = session();
        assert_eq!(s.history(), vec!["Canada"]);
        assert_eq!(s.current_index(), 0);
        assert!(!s.has_won());
        assert!(!s.is_lost());
    }

    #[test]
    fn exact_link_applies() {
        let mut s = session();
        let outcome = s.visit("politics of canada").unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                title: "Politics of Canada".to_string(),
                losing: false
            }
        );
        assert_eq!(s.history(), vec!["Canada", "Politics of Canada"]);
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn near_miss_needs_confirmation() {
        let mut s = session();
        let outcome = s.visit("Otawa").unwrap();
        let MoveOutcome::NeedsConfirmation(p) = outcome else {
            panic!("expected confirmation, got {outcome:?}");
        };
        assert_eq!(p.suggestion, "Ottawa");
        assert_eq!(s.history().len(), 1);
        assert!(s.pending().is_some());
    }

    #[test]
    fn confirm_correction() {
        let mut s = session();
        s.visit("Otawa").unwrap();
        let outcome = s.confirm(Confirmation::Corrected).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::AppliedAfterCorrection {
                original: "Otawa".to_string(),
                corrected: "Ottawa".to_string()
            }
        );
        assert!(!s.is_lost());
        assert!(s.pending().is_none());
    }

    #[test]
    fn confirm_original_loses() {
        let mut s = session();
        s.visit("Kanatta").unwrap();
        let outcome = s.confirm(Confirmation::Original).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                title: "Kanatta".to_string(),
                losing: true
            }
        );
        assert!(s.is_lost());
        assert_eq!(s.visits()[1].standing, Standing::Invalid);
        assert!(matches!(s.visit("Ottawa"), Err(EngineError::GameOver)));
    }

    #[test]
    fn confirm_original_missing_article_keeps_state() {
        let mut s = session();
        s.visit("Ottawaa").unwrap();
        assert!(matches!(
            s.confirm(Confirmation::Original),
            Err(EngineError::SourceUnavailable(_))
        ));
        assert_eq!(s.history(), vec!["Canada"]);
        assert!(!s.is_lost());
    }

    #[test]
    fn cancel_correction() {
        let mut s = session();
        s.visit("Otawa").unwrap();
        assert_eq!(s.confirm(Confirmation::Cancel).unwrap(), MoveOutcome::Cancelled);
        assert_eq!(s.history(), vec!["Canada"]);
    }

    #[test]
    fn confirm_without_pending() {
        let mut s = session();
        assert!(matches!(
            s.confirm(Confirmation::Corrected),
            Err(EngineError::NoPendingCorrection)
        ));
    }

    #[test]
    fn rejected_move_lists_suggestions() {
        let mut s = session();
        let outcome = s.visit("Zzyzx").unwrap();
        let MoveOutcome::Rejected {
            reason,
            suggestions,
            ..
        } = outcome
        else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(reason, "no close link");
        assert_eq!(suggestions, vec!["Politics of Canada", "Ottawa", "Kanata"]);
        assert_eq!(s.history(), vec!["Canada"]);
    }

    #[test]
    fn source_failure_leaves_session_unchanged() {
        let graph = LinkGraph::new().with_article(Article::new("Canada").with_links(["Nowhere"]));
        let mut s =
            NavigationSession::new(graph, "Canada", "Ottawa", FuzzyMatcher::new(0.8)).unwrap();
        assert!(matches!(
            s.visit("Nowhere"),
            Err(EngineError::SourceUnavailable(_))
        ));
        assert_eq!(s.history(), vec!["Canada"]);
        assert!(!s.is_lost());
    }

    #[test]
    fn win_on_endpoint() {
        let mut s = session();
        s.visit("Politics of Canada").unwrap();
        assert!(!s.has_won());
        s.visit("Parliament of Canada").unwrap();
        assert!(s.has_won());
        assert_eq!(s.visits()[2].standing, Standing::Reached);
        assert_eq!(s.moves(), 2);
        assert!(matches!(s.back(1), Err(EngineError::GameOver)));
    }

    #[test]
    fn back_truncates_history() {
        let mut s = session();
        s.visit("Ottawa").unwrap();
        s.visit("Canada").unwrap();
        let outcome = s.back(1).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::WentBack {
                title: "Ottawa".to_string(),
                steps: 1
            }
        );
        s.visit("Canada").unwrap();
        assert_eq!(s.history(), vec!["Canada", "Ottawa", "Canada"]);
    }

    #[test]
    fn back_clamps_at_start() {
        let mut s = session();
        s.visit("Ottawa").unwrap();
        let outcome = s.back(10).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::WentBack {
                title: "Canada".to_string(),
                steps: 1
            }
        );
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn back_zero_is_invalid() {
        let mut s = session();
        assert!(matches!(s.back(0), Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn confirmation_parse() {
        assert_eq!(Confirmation::parse("Y"), Some(Confirmation::Corrected));
        assert_eq!(Confirmation::parse(" no "), Some(Confirmation::Original));
        assert_eq!(Confirmation::parse("c"), Some(Confirmation::Cancel));
        assert_eq!(Confirmation::parse("maybe"), None);
    }
}
