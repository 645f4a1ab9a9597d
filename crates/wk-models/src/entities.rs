//! Pattern-based named entity tagger.
//!
//! Tags runs of capitalized words as `NAME`, month names and plausible years
//! as `DATE`, and other numbers as `CARDINAL`.

use regex::Regex;

use crate::capability::{EntityHighlighter, EntitySpan};
use crate::error::ModelResult;

/// Capitalized words that usually just start a sentence.
const SENTENCE_STARTERS: &[&str] = &[
    "A", "An", "The", "In", "It", "Its", "This", "These", "That", "Those", "On", "At", "As", "He",
    "She", "They", "His", "Her", "Their", "There", "After", "Before", "During", "Since", "While",
    "When", "With", "From", "For", "By", "Of", "To", "Although", "However",
];

const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Regex-driven entity tagger. No model files needed.
#[derive(Debug, Clone)]
pub struct PatternHighlighter {
    name: Regex,
    number: Regex,
}

impl PatternHighlighter {
    /// Build the tagger.
    pub fn new() -> ModelResult<Self> {
        Ok(Self {
            name: Regex::new(
                r"\b\p{Lu}[\p{L}\p{M}'’-]*(?:(?:\s+(?:of|the|de|von|van|and))*\s+\p{Lu}[\p{L}\p{M}'’-]*)*",
            )?,
            number: Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b")?,
        })
    }

    fn names(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        for m in self.name.find_iter(text) {
            let mut start = m.start();
            let mut span = m.as_str();
            let first = span.split_whitespace().next().unwrap_or(span);
            if SENTENCE_STARTERS.contains(&first) {
                match span[first.len()..].find(|c: char| !c.is_whitespace()) {
                    Some(offset) => {
                        start += first.len() + offset;
                        span = &text[start..m.end()];
                    }
                    None => continue,
                }
            }
            let label = if MONTHS.contains(&span) { "DATE" } else { "NAME" };
            spans.push(EntitySpan {
                start,
                end: m.end(),
                label: label.to_string(),
            });
        }
        spans
    }

    fn numbers(&self, text: &str) -> Vec<EntitySpan> {
        self.number
            .find_iter(text)
            .map(|m| {
                let s = m.as_str();
                let is_year = (3..=4).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit());
                EntitySpan {
                    start: m.start(),
                    end: m.end(),
                    label: if is_year { "DATE" } else { "CARDINAL" }.to_string(),
                }
            })
            .collect()
    }
}

impl EntityHighlighter for PatternHighlighter {
    fn entities(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans = self.names(text);
        spans.extend(self.numbers(text));
        spans.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

        let mut merged: Vec<EntitySpan> = Vec::with_capacity(spans.len());
        for span in spans {
            if merged.last().is_none_or(|last| span.start >= last.end) {
                merged.push(span);
            }
        }
        merged
    }
}
