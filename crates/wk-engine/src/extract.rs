//! Argument extraction from free text.
//!
//! Titles are found by an ordered list of rules, first match wins:
//! quoted span, then a link named in the text, then the phrase following a
//! cue word such as "about". Page counts are read from cardinal or ordinal
//! numbers and default to one.

use regex::Regex;
use tracing::debug;
use wk_core::{ArgumentKind, Intent, normalize_title};

use crate::config::BackCountPolicy;
use crate::error::{EngineError, EngineResult};

/// An extracted command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// An article title.
    Title(String),
    /// Go back this many pages.
    Count(usize),
    /// Go back to this one-based history position. Not yet checked
    /// against the history; see [`back_count`].
    Position(i64),
}

/// A named title extraction rule.
#[derive(Clone, Copy)]
pub struct TitleRule {
    /// Rule name, for logging.
    pub name: &'static str,
    rule: fn(&ArgumentExtractor, &str, &[String]) -> Option<String>,
}

impl TitleRule {
    /// Run this rule alone.
    pub fn apply(&self, extractor: &ArgumentExtractor, text: &str, links: &[String]) -> Option<String> {
        (self.rule)(extractor, text, links)
    }
}

/// The title rules in priority order.
pub const TITLE_RULES: &[TitleRule] = &[
    TitleRule {
        name: "quoted",
        rule: ArgumentExtractor::quoted_title,
    },
    TitleRule {
        name: "link",
        rule: ArgumentExtractor::contained_link,
    },
    TitleRule {
        name: "cue",
        rule: ArgumentExtractor::cued_phrase,
    },
];

/// Phrases that tend to precede a title, checked in this order.
const CUES: &[&str] = &[
    "on the topic of",
    "about",
    "regarding",
    "concerning",
    "referring to",
    "relating to",
    "dealing with",
    "link",
    "subject",
    "topic",
    "matter",
    "page",
    "article",
    "summary",
];

/// Words skipped between a cue and the title.
const LEADING_FILLER: &[&str] = &[
    "the", "a", "an", "on", "of", "for", "to", "called", "named", "titled",
];

/// Words that end a cued phrase: courtesy words and clause openers.
const TRAILING_STOP: &[&str] = &[
    "please", "and", "then", "now", "instead", "thanks", "next", "again", "right", "because",
    "since", "so", "which", "that", "who", "where", "when", "is", "was", "are", "were", "if",
    "but", "or",
];

const CARDINALS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

/// "once", "twice", "thrice": a repeat count.
const MULTIPLES: &[&str] = &["once", "twice", "thrice"];

const ORDINALS: &[&str] = &[
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
];

/// Words after which a number names a history position.
const POSITION_NOUNS: &[&str] = &["page", "article", "position", "number"];

/// Pulls command arguments out of free text.
#[derive(Debug, Clone)]
pub struct ArgumentExtractor {
    quoted: Regex,
    back_policy: BackCountPolicy,
}

impl ArgumentExtractor {
    /// Create an extractor. `back_policy` decides what a zero or negative
    /// page count turns into.
    pub fn new(back_policy: BackCountPolicy) -> EngineResult<Self> {
        let quoted = Regex::new(r#""([^"]+)"|“([^”]+)”|„([^“”]+)[“”]|«([^»]+)»|‘([^’]+)’|(?:^|\s)'(.+?)'(?:$|[\s.,;:!?])"#)
            .map_err(|e| EngineError::InvalidArgument(e.to_string()))?;
        Ok(Self {
            quoted,
            back_policy,
        })
    }

    /// Names of the title rules, in the order they are tried.
    pub fn title_rules(&self) -> Vec<&'static str> {
        TITLE_RULES.iter().map(|r| r.name).collect()
    }

    /// Extract the argument `intent` needs from `text`.
    ///
    /// Intents without an argument yield `Ok(None)`.
    pub fn extract(
        &self,
        intent: Intent,
        text: &str,
        links: &[String],
    ) -> EngineResult<Option<Argument>> {
        match intent.argument_kind() {
            Some(ArgumentKind::Title) => self.title(text, links).map(|t| Some(Argument::Title(t))),
            Some(ArgumentKind::Count) => self.count(text).map(Some),
            None => Ok(None),
        }
    }

    /// Extract a title, trying each rule in [`TITLE_RULES`] order.
    pub fn title(&self, text: &str, links: &[String]) -> EngineResult<String> {
        for rule in TITLE_RULES {
            if let Some(title) = rule.apply(self, text, links) {
                debug!(rule = rule.name, title = %title, "title extracted");
                return Ok(title);
            }
        }
        Err(EngineError::ExtractionFailure("no title found".to_string()))
    }

    /// Extract a page count or position. Defaults to one page.
    pub fn count(&self, text: &str) -> EngineResult<Argument> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
            .collect();
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        for (i, word) in words.iter().enumerate() {
            let after_position_noun = i > 0 && POSITION_NOUNS.contains(&words[i - 1]);

            if let Some(k) = parse_ordinal(word) {
                return Ok(Argument::Position(k));
            }
            let value = word
                .parse::<i64>()
                .ok()
                .or_else(|| word_index(CARDINALS, word))
                .or_else(|| word_index(MULTIPLES, word));
            if let Some(n) = value {
                if after_position_noun {
                    return Ok(Argument::Position(n));
                }
                return self.back_policy.apply(n).map(Argument::Count);
            }
        }
        Ok(Argument::Count(1))
    }

    fn quoted_title(&self, text: &str, _links: &[String]) -> Option<String> {
        let caps = self.quoted.captures(text)?;
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str().to_string())
    }

    fn contained_link(&self, text: &str, links: &[String]) -> Option<String> {
        let haystack = normalize_title(text);
        let mut candidates: Vec<&String> = links.iter().collect();
        // Stable sort keeps source order among equal lengths.
        candidates.sort_by_key(|l| std::cmp::Reverse(l.chars().count()));
        candidates
            .into_iter()
            .find(|link| contains_phrase(&haystack, &normalize_title(link)))
            .cloned()
    }

    fn cued_phrase(&self, text: &str, _links: &[String]) -> Option<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

        for cue in CUES {
            let cue_words: Vec<&str> = cue.split(' ').collect();
            let Some(pos) = lowered
                .windows(cue_words.len())
                .position(|w| w.iter().zip(&cue_words).all(|(a, b)| a == b))
            else {
                continue;
            };

            let mut rest = words[pos + cue_words.len()..].iter().peekable();
            while rest
                .peek()
                .is_some_and(|w| LEADING_FILLER.contains(&w.to_lowercase().as_str()))
            {
                rest.next();
            }

            let mut phrase: Vec<&str> = Vec::new();
            for word in rest {
                if TRAILING_STOP.contains(&word.to_lowercase().as_str()) {
                    break;
                }
                let trimmed = word.trim_end_matches(|c: char| ",.;:!?".contains(c));
                if !trimmed.is_empty() {
                    phrase.push(trimmed);
                }
                if trimmed.len() != word.len() {
                    break;
                }
            }

            if phrase.is_empty() {
                return None;
            }
            return Some(phrase.join(" "));
        }
        None
    }
}

/// Resolve a back argument against the current history index.
///
/// A position `k` (one-based) becomes `current_index + 1 - k` pages.
pub fn back_count(
    argument: &Argument,
    current_index: usize,
    policy: BackCountPolicy,
) -> EngineResult<usize> {
    match argument {
        Argument::Count(n) => policy.apply(i64::try_from(*n).unwrap_or(i64::MAX)),
        Argument::Position(k) => {
            let current = i64::try_from(current_index).unwrap_or(i64::MAX);
            policy.apply(current.saturating_add(1).saturating_sub(*k))
        }
        Argument::Title(t) => Err(EngineError::InvalidArgument(format!(
            "expected a page count, got \"{t}\""
        ))),
    }
}

fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + needle.len()..].chars().next();
        before.is_none_or(|c| !c.is_alphanumeric()) && after.is_none_or(|c| !c.is_alphanumeric())
    })
}

fn word_index(table: &[&str], word: &str) -> Option<i64> {
    table
        .iter()
        .position(|w| *w == word)
        .and_then(|i| i64::try_from(i + 1).ok())
}

fn parse_ordinal(word: &str) -> Option<i64> {
    if let Some(k) = word_index(ORDINALS, word) {
        return Some(k);
    }
    let digits = word
        .strip_suffix("st")
        .or_else(|| word.strip_suffix("nd"))
        .or_else(|| word.strip_suffix("rd"))
        .or_else(|| word.strip_suffix("th"))?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ArgumentExtractor {
        ArgumentExtractor::new(BackCountPolicy::Clamp).unwrap()
    }

    fn links(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rule_order() {
        assert_eq!(extractor().title_rules(), vec!["quoted", "link", "cue"]);
    }

    #[test]
    fn quoted_span() {
        let ex = extractor();
        assert_eq!(ex.title("visit \"Politics of Canada\" now", &[]).unwrap(), "Politics of Canada");
        assert_eq!(ex.title("open “Ottawa”", &[]).unwrap(), "Ottawa");
        assert_eq!(ex.title("go to 'New France'", &[]).unwrap(), "New France");
    }

    #[test]
    fn apostrophe_is_not_a_quote() {
        let ex = extractor();
        let links = links(&["Canada"]);
        assert_eq!(ex.title("let's see what's in Canada", &links).unwrap(), "Canada");
    }

    #[test]
    fn single_quotes_keep_inner_apostrophes() {
        let ex = extractor();
        assert_eq!(
            ex.title("go to 'Hudson's Bay Company'", &[]).unwrap(),
            "Hudson's Bay Company"
        );
        assert_eq!(ex.title("open 'Women's rights', please", &[]).unwrap(), "Women's rights");
    }

    #[test]
    fn quoted_beats_link() {
        let ex = extractor();
        let links = links(&["Canada"]);
        assert_eq!(ex.title("not Canada but \"Quebec\"", &links).unwrap(), "Quebec");
    }

    #[test]
    fn longest_link_wins() {
        let ex = extractor();
        let links = links(&["United", "United States", "States"]);
        assert_eq!(
            ex.title("take me to the united states please", &links).unwrap(),
            "United States"
        );
    }

    #[test]
    fn link_must_be_whole_words() {
        let ex = extractor();
        let links = links(&["Art"]);
        assert!(ex.title("show me the party", &links).is_err());
    }

    #[test]
    fn link_beats_cue() {
        let ex = extractor();
        let links = links(&["Canada", "Ottawa"]);
        assert_eq!(
            ex.title("please go to the article about Canada", &links).unwrap(),
            "Canada"
        );
    }

    #[test]
    fn cue_phrase() {
        let ex = extractor();
        assert_eq!(
            ex.title("I'd like to read about the Hudson's Bay Company please", &[]).unwrap(),
            "Hudson's Bay Company"
        );
        assert_eq!(
            ex.title("open the article on quantum physics.", &[]).unwrap(),
            "quantum physics"
        );
        assert_eq!(
            ex.title("tell me something on the topic of plate tectonics", &[]).unwrap(),
            "plate tectonics"
        );
    }

    #[test]
    fn cue_phrase_stops_at_clause() {
        let ex = extractor();
        assert_eq!(
            ex.title("I want to read about France because it is nice", &[]).unwrap(),
            "France"
        );
        assert_eq!(
            ex.title("tell me about the Treaty of Paris which ended the war", &[]).unwrap(),
            "Treaty of Paris"
        );
        assert_eq!(ex.title("the article on jazz is next", &[]).unwrap(), "jazz");
    }

    #[test]
    fn cue_without_phrase_fails() {
        let ex = extractor();
        assert!(matches!(
            ex.title("what is this about", &[]),
            Err(EngineError::ExtractionFailure(_))
        ));
    }

    #[test]
    fn nothing_found() {
        let ex = extractor();
        assert!(matches!(
            ex.title("go somewhere nice", &links(&["Canada"])),
            Err(EngineError::ExtractionFailure(_))
        ));
    }

    #[test]
    fn count_defaults_to_one() {
        assert_eq!(extractor().count("go back").unwrap(), Argument::Count(1));
    }

    #[test]
    fn count_digits_and_words() {
        let ex = extractor();
        assert_eq!(ex.count("go back 3 pages").unwrap(), Argument::Count(3));
        assert_eq!(ex.count("go back two pages").unwrap(), Argument::Count(2));
    }

    #[test]
    fn count_repeat_words() {
        let ex = extractor();
        assert_eq!(ex.count("back twice").unwrap(), Argument::Count(2));
        assert_eq!(ex.count("go back thrice").unwrap(), Argument::Count(3));
        assert_eq!(ex.count("go back once more").unwrap(), Argument::Count(1));
    }

    #[test]
    fn ordinals_are_positions() {
        let ex = extractor();
        assert_eq!(ex.count("back to the second article").unwrap(), Argument::Position(2));
        assert_eq!(ex.count("return to the 1st page").unwrap(), Argument::Position(1));
        assert_eq!(ex.count("go back to page 4").unwrap(), Argument::Position(4));
    }

    #[test]
    fn zero_count_clamps_or_rejects() {
        assert_eq!(extractor().count("back 0 pages").unwrap(), Argument::Count(1));
        assert_eq!(extractor().count("back -2").unwrap(), Argument::Count(1));
        let strict = ArgumentExtractor::new(BackCountPolicy::Reject).unwrap();
        assert!(matches!(
            strict.count("back 0 pages"),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn position_to_count() {
        let policy = BackCountPolicy::Clamp;
        // history of 4, at index 3: position 2 is two pages back
        assert_eq!(back_count(&Argument::Position(2), 3, policy).unwrap(), 2);
        // the current position resolves to zero and clamps
        assert_eq!(back_count(&Argument::Position(4), 3, policy).unwrap(), 1);
        assert!(back_count(&Argument::Position(4), 3, BackCountPolicy::Reject).is_err());
        assert_eq!(back_count(&Argument::Count(5), 3, policy).unwrap(), 5);
    }

    #[test]
    fn extract_dispatches_on_intent() {
        let ex = extractor();
        let links = links(&["Canada"]);
        assert_eq!(
            ex.extract(Intent::Visit, "go to Canada", &links).unwrap(),
            Some(Argument::Title("Canada".to_string()))
        );
        assert_eq!(
            ex.extract(Intent::Back, "go back please", &links).unwrap(),
            Some(Argument::Count(1))
        );
        assert_eq!(ex.extract(Intent::Links, "links", &links).unwrap(), None);
    }
}
