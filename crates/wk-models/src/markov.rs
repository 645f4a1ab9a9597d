//! Markov-chain text generator.
//!
//! A first-order word chain trained on whatever context the caller primes
//! it with (typically the current article). Completion continues from the
//! last word of the prompt and walks the chain with a seeded RNG.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::capability::TextGenerator;
use crate::error::{ModelError, ModelResult};

/// Punctuation tokenized separately from words.
const PUNCTUATION: &[char] = &['.', '!', '?', ',', ';', ':'];

/// Token used as the predecessor of sentence-initial words.
const SENTENCE_START: &str = "<S>";

/// A seeded first-order Markov text generator.
#[derive(Debug, Clone)]
pub struct MarkovGenerator {
    transitions: HashMap<String, Vec<String>>,
    rng: StdRng,
}

impl MarkovGenerator {
    /// Create an untrained generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            transitions: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Add the word transitions in `text` to the chain.
    pub fn train(&mut self, text: &str) {
        let mut prev = SENTENCE_START.to_string();
        for token in tokenize(text) {
            let ends_sentence = matches!(token.as_str(), "." | "!" | "?");
            self.transitions
                .entry(key(&prev))
                .or_default()
                .push(token.clone());
            prev = if ends_sentence {
                SENTENCE_START.to_string()
            } else {
                token
            };
        }
    }

    /// Whether the chain has any transitions.
    pub fn is_trained(&self) -> bool {
        !self.transitions.is_empty()
    }
}

impl TextGenerator for MarkovGenerator {
    fn prime(&mut self, context: &str) {
        self.train(context);
    }

    fn complete(&mut self, prompt: &str, max_new_tokens: usize) -> ModelResult<String> {
        if !self.is_trained() {
            return Err(ModelError::NoData);
        }

        let mut state = tokenize(prompt)
            .pop()
            .unwrap_or_else(|| SENTENCE_START.to_string());
        let mut out: Vec<String> = Vec::new();

        for _ in 0..max_new_tokens {
            let options = self
                .transitions
                .get(&key(&state))
                .or_else(|| self.transitions.get(SENTENCE_START));
            let Some(next) = options.and_then(|o| o.choose(&mut self.rng)).cloned() else {
                break;
            };
            state = if matches!(next.as_str(), "." | "!" | "?") {
                SENTENCE_START.to_string()
            } else {
                next.clone()
            };
            out.push(next);
        }

        Ok(reassemble(&out))
    }
}

fn key(token: &str) -> String {
    if token == SENTENCE_START {
        token.to_string()
    } else {
        token.to_lowercase()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let trimmed = word.trim_end_matches(PUNCTUATION);
        if !trimmed.is_empty() {
            tokens.push(trimmed.to_string());
        }
        for c in word[trimmed.len()..].chars() {
            tokens.push(c.to_string());
        }
    }
    tokens
}

fn reassemble(tokens: &[String]) -> String {
    let mut text = String::new();
    for token in tokens {
        let is_punct = token.chars().all(|c| PUNCTUATION.contains(&c));
        if !text.is_empty() && !is_punct {
            text.push(' ');
        }
        text.push_str(token);
    }
    text
}
