//! Approximate title matching.

use strsim::jaro_winkler;
use tracing::debug;
use wk_core::normalize_title;

/// Minimum similarity for a title to appear in suggestion lists.
const SUGGEST_THRESHOLD: f64 = 0.6;

/// The closest title to a candidate and how close it is.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// The matched title, spelled as in the input list.
    pub title: String,
    /// Jaro-Winkler similarity in `[0, 1]`.
    pub score: f64,
}

/// Jaro-Winkler matching against a set of titles.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    /// Create a matcher that accepts scores strictly above `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Find the most similar title. Ties go to the earliest title.
    ///
    /// Returns `None` only when `titles` is empty.
    pub fn best_match<S: AsRef<str>>(&self, candidate: &str, titles: &[S]) -> Option<FuzzyMatch> {
        let candidate = normalize_title(candidate);
        let mut best: Option<FuzzyMatch> = None;
        for title in titles {
            let title = title.as_ref();
            let score = jaro_winkler(&candidate, &normalize_title(title));
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(FuzzyMatch {
                    title: title.to_string(),
                    score,
                });
            }
        }
        if let Some(m) = &best {
            debug!(candidate = %candidate, best = %m.title, score = m.score, "fuzzy match");
        }
        best
    }

    /// Whether a match is close enough to offer as a correction.
    pub fn accepts(&self, m: &FuzzyMatch) -> bool {
        m.score > self.threshold
    }

    /// Titles that start with, contain, or loosely resemble `partial`, best first.
    pub fn suggestions<S: AsRef<str>>(&self, partial: &str, titles: &[S], limit: usize) -> Vec<String> {
        let partial = normalize_title(partial);
        let mut scored: Vec<(String, f64)> = titles
            .iter()
            .filter_map(|title| {
                let title = title.as_ref();
                let name = normalize_title(title);
                if name.starts_with(&partial) {
                    Some((title.to_string(), 2.0))
                } else if name.contains(&partial) {
                    Some((title.to_string(), 1.0))
                } else {
                    let score = jaro_winkler(&partial, &name);
                    (score >= SUGGEST_THRESHOLD).then(|| (title.to_string(), score))
                }
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(limit)
            .map(|(title, _)| title)
            .collect()
    }
}
