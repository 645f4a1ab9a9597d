//! TF-IDF nearest-centroid intent classifier.
//!
//! Each training sample becomes an L2-normalized TF-IDF vector; each intent
//! is represented by the normalized mean of its samples. Classification picks
//! the centroid with the highest cosine similarity and reports a softmax over
//! all centroid scores as confidence.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wk_core::Intent;

use crate::capability::{Classification, IntentClassifier};
use crate::error::{ModelError, ModelResult};

/// Softmax temperature applied to cosine scores.
const TEMPERATURE: f64 = 0.1;

/// Built-in training corpus: `(label, sample)`.
const DEFAULT_SAMPLES: &[(&str, &str)] = &[
    ("visit", "visit Canada"),
    ("visit", "go to the article about France"),
    ("visit", "open the page on physics"),
    ("visit", "take me to Paris"),
    ("visit", "I want to read about music"),
    ("visit", "follow the link to Germany"),
    ("visit", "let's check out the article on mathematics"),
    ("visit", "navigate to the United States"),
    ("visit", "click on the link for history of Europe"),
    ("visit", "jump to Japan"),
    ("back", "back"),
    ("back", "go back"),
    ("back", "go back two pages"),
    ("back", "return to the previous page"),
    ("back", "take me back"),
    ("back", "undo my last move"),
    ("back", "go back to the first article"),
    ("back", "previous page please"),
    ("back", "return to the last article"),
    ("back", "back three pages"),
    ("history", "history"),
    ("history", "show my history"),
    ("history", "which pages have I visited"),
    ("history", "where have I been"),
    ("history", "list the pages I went through"),
    ("history", "show my path so far"),
    ("history", "what was my route"),
    ("more", "more"),
    ("more", "show me more"),
    ("more", "read the full article"),
    ("more", "show the whole page content"),
    ("more", "tell me more about this"),
    ("more", "I want to read everything"),
    ("more", "display the full text"),
    ("web", "web"),
    ("web", "open in browser"),
    ("web", "open this page in the web browser"),
    ("web", "show the url"),
    ("web", "view it online"),
    ("web", "open the website"),
    ("web", "what is the web address"),
    ("links", "links"),
    ("links", "show the links"),
    ("links", "list all links"),
    ("links", "what links are on this page"),
    ("links", "which articles can I go to"),
    ("links", "show available links"),
    ("links", "where can I go from here"),
    ("similar", "similar"),
    ("similar", "which links are similar to the target"),
    ("similar", "rank links by similarity"),
    ("similar", "what is closest to the end point"),
    ("similar", "show the most similar links"),
    ("similar", "suggest a link related to the goal"),
    ("similar", "which page is nearest to the destination"),
    ("entities", "entities"),
    ("entities", "highlight the named entities"),
    ("entities", "show named entities"),
    ("entities", "which people and places are mentioned"),
    ("entities", "find the names in the summary"),
    ("entities", "tag entities in this text"),
    ("entities", "show me the proper nouns"),
    ("generate", "generate"),
    ("generate", "generate text"),
    ("generate", "write a continuation of the summary"),
    ("generate", "make up the rest of the text"),
    ("generate", "continue the summary"),
    ("generate", "invent some text"),
    ("generate", "generate a story from this article"),
    ("quit", "quit"),
    ("quit", "exit"),
    ("quit", "quit the game"),
    ("quit", "I want to stop playing"),
    ("quit", "end the game"),
    ("quit", "goodbye"),
    ("quit", "leave the game"),
    ("quit", "I give up"),
    ("help", "help"),
    ("help", "show help"),
    ("help", "what commands are there"),
    ("help", "how do I play"),
    ("help", "I need help"),
    ("help", "show the instructions"),
    ("help", "explain the rules"),
];

type SparseVector = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Centroid {
    intent: Intent,
    weights: SparseVector,
}

/// A trained TF-IDF nearest-centroid classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentroidClassifier {
    idf: BTreeMap<String, f64>,
    centroids: Vec<Centroid>,
}

impl CentroidClassifier {
    /// Train on the built-in corpus.
    pub fn with_default_corpus() -> Self {
        let samples: Vec<(Intent, String)> = DEFAULT_SAMPLES
            .iter()
            .filter_map(|(label, text)| Intent::from_label(label).map(|i| (i, text.to_string())))
            .collect();
        match Self::train(&samples) {
            Ok(clf) => clf,
            // The corpus is a non-empty constant.
            Err(_) => Self {
                idf: BTreeMap::new(),
                centroids: Vec::new(),
            },
        }
    }

    /// Train on `(intent, sample)` pairs.
    pub fn train(samples: &[(Intent, String)]) -> ModelResult<Self> {
        if samples.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let tokenized: Vec<(Intent, Vec<String>)> = samples
            .iter()
            .map(|(intent, text)| (*intent, tokenize(text)))
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for (_, tokens) in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for token in unique {
                *doc_freq.entry(token).or_default() += 1;
            }
        }

        let n = tokenized.len() as f64;
        let idf: BTreeMap<String, f64> = doc_freq
            .into_iter()
            .map(|(token, df)| (token.to_string(), ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .collect();

        let mut sums: HashMap<Intent, (SparseVector, usize)> = HashMap::new();
        for (intent, tokens) in &tokenized {
            let vector = weigh(tokens, &idf);
            let (sum, count) = sums.entry(*intent).or_default();
            for (token, w) in vector {
                *sum.entry(token).or_default() += w;
            }
            *count += 1;
        }

        let centroids = Intent::ALL
            .into_iter()
            .filter_map(|intent| {
                let (sum, count) = sums.remove(&intent)?;
                let mean: SparseVector = sum
                    .into_iter()
                    .map(|(t, w)| (t, w / count as f64))
                    .collect();
                Some(Centroid {
                    intent,
                    weights: normalized(mean),
                })
            })
            .collect();

        Ok(Self { idf, centroids })
    }

    /// Parse two-column sample lines, `label,sample` unless a header on the
    /// first line says `sample,label`. Blank lines are skipped; samples may
    /// be wrapped in double quotes.
    pub fn parse_samples(data: &str) -> ModelResult<Vec<(Intent, String)>> {
        let mut samples = Vec::new();
        let mut label_first = true;
        for (i, line) in data.lines().enumerate() {
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line_no == 1 {
                if let Some(order) = header_order(line) {
                    label_first = order;
                    continue;
                }
            }
            let split = if label_first {
                line.split_once(',')
            } else {
                line.rsplit_once(',').map(|(sample, label)| (label, sample))
            };
            let (label, sample) = split.ok_or_else(|| ModelError::Parse {
                line: line_no,
                message: "expected a label and a sample".to_string(),
            })?;
            let intent = Intent::from_label(label).ok_or_else(|| ModelError::UnknownLabel {
                line: line_no,
                label: label.trim().to_string(),
            })?;
            let sample = sample.trim().trim_matches('"').trim();
            if sample.is_empty() {
                return Err(ModelError::Parse {
                    line: line_no,
                    message: "empty sample".to_string(),
                });
            }
            samples.push((intent, sample.to_string()));
        }
        Ok(samples)
    }

    /// Load a trained model from JSON.
    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a trained model file.
    pub fn load(path: &Path) -> ModelResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Write the trained model as JSON.
    pub fn save(&self, path: &Path) -> ModelResult<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Intents this model can produce.
    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.centroids.iter().map(|c| c.intent)
    }
}

impl IntentClassifier for CentroidClassifier {
    fn classify(&self, text: &str) -> Classification {
        let vector = normalized(weigh(&tokenize(text), &self.idf));
        if vector.is_empty() || self.centroids.is_empty() {
            debug!(text, "no known words, defaulting to help");
            return Classification {
                intent: Intent::Help,
                confidence: 0.0,
            };
        }

        let scores: Vec<f64> = self
            .centroids
            .iter()
            .map(|c| dot(&vector, &c.weights))
            .collect();

        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }

        let exp_sum: f64 = scores.iter().map(|s| ((s - scores[best]) / TEMPERATURE).exp()).sum();
        let confidence = 1.0 / exp_sum;

        Classification {
            intent: self.centroids[best].intent,
            confidence,
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn weigh(tokens: &[String], idf: &BTreeMap<String, f64>) -> SparseVector {
    let mut vector = SparseVector::new();
    for token in tokens {
        if let Some(w) = idf.get(token) {
            *vector.entry(token.clone()).or_default() += w;
        }
    }
    vector
}

fn normalized(vector: SparseVector) -> SparseVector {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm == 0.0 {
        return SparseVector::new();
    }
    vector.into_iter().map(|(t, w)| (t, w / norm)).collect()
}

fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    a.iter()
        .filter_map(|(t, w)| b.get(t).map(|v| w * v))
        .sum()
}

/// Column order from a header line: `Some(true)` for `label,sample`,
/// `Some(false)` for `sample,label`, `None` if the line is not a header.
fn header_order(line: &str) -> Option<bool> {
    let columns: Vec<String> = line
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_lowercase())
        .collect();
    match columns.as_slice() {
        [a, b] if a == "label" && b == "sample" => Some(true),
        [a, b] if a == "sample" && b == "label" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_corpus_covers_every_intent() {
        let clf = CentroidClassifier::with_default_corpus();
        let intents: Vec<Intent> = clf.intents().collect();
        assert_eq!(intents, Intent::ALL.to_vec());
    }

    #[test]
    fn classifies_distinctive_commands() {
        let clf = CentroidClassifier::with_default_corpus();
        assert_eq!(clf.classify("please take me back").intent, Intent::Back);
        assert_eq!(clf.classify("list the links").intent, Intent::Links);
        assert_eq!(clf.classify("quit").intent, Intent::Quit);
        assert_eq!(clf.classify("highlight entities").intent, Intent::Entities);
        assert_eq!(clf.classify("generate some text").intent, Intent::Generate);
    }

    #[test]
    fn exact_training_sample_is_confident() {
        let clf = CentroidClassifier::with_default_corpus();
        let c = clf.classify("help");
        assert_eq!(c.intent, Intent::Help);
        assert!(c.confidence > 0.5);
        assert!(c.confidence <= 1.0);
    }

    #[test]
    fn unknown_words_default_to_help() {
        let clf = CentroidClassifier::with_default_corpus();
        let c = clf.classify("zzyzx qwv");
        assert_eq!(c.intent, Intent::Help);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn train_rejects_empty() {
        assert!(matches!(
            CentroidClassifier::train(&[]),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn parse_samples_with_header_and_quotes() {
        let samples =
            CentroidClassifier::parse_samples("label,sample\nvisit,\"go to Rome\"\n\nquit, bye\n")
                .unwrap();
        assert_eq!(
            samples,
            vec![
                (Intent::Visit, "go to Rome".to_string()),
                (Intent::Quit, "bye".to_string())
            ]
        );
    }

    #[test]
    fn parse_samples_follow_header_order() {
        let samples = CentroidClassifier::parse_samples(
            "Sample,Label\nshow me the links,links\n\"well, I quit\",quit\n",
        )
        .unwrap();
        assert_eq!(
            samples,
            vec![
                (Intent::Links, "show me the links".to_string()),
                (Intent::Quit, "well, I quit".to_string())
            ]
        );
    }

    #[test]
    fn parse_samples_unknown_label() {
        let err = CentroidClassifier::parse_samples("dance,do the tango").unwrap_err();
        assert!(matches!(err, ModelError::UnknownLabel { line: 1, .. }));
    }

    #[test]
    fn parse_samples_missing_comma() {
        let err = CentroidClassifier::parse_samples("visit\n").unwrap_err();
        assert!(matches!(err, ModelError::Parse { line: 1, .. }));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let clf = CentroidClassifier::train(&[
            (Intent::Quit, "stop".to_string()),
            (Intent::Links, "links please".to_string()),
        ])
        .unwrap();
        clf.save(&path).unwrap();

        let loaded = CentroidClassifier::load(&path).unwrap();
        assert_eq!(loaded.classify("stop").intent, Intent::Quit);
        assert_eq!(loaded.classify("links").intent, Intent::Links);
    }
}
