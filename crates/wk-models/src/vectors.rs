//! Word-vector similarity model.

use std::collections::HashMap;
use std::path::Path;

use crate::capability::SimilarityModel;
use crate::error::{ModelError, ModelResult};

/// A table of word embeddings in the plain `word v1 v2 ...` text format.
#[derive(Debug, Clone, Default)]
pub struct WordVectors {
    dim: usize,
    table: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text format. All rows must share one dimension.
    pub fn parse(data: &str) -> ModelResult<Self> {
        let mut vectors = Self::new();
        for (i, line) in data.lines().enumerate() {
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let values = parts
                .map(str::parse::<f32>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ModelError::Parse {
                    line: i + 1,
                    message: e.to_string(),
                })?;
            vectors.insert(word, values).map_err(|message| ModelError::Parse {
                line: i + 1,
                message,
            })?;
        }
        Ok(vectors)
    }

    /// Read and parse a vector file.
    pub fn load(path: &Path) -> ModelResult<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Add or replace a word's vector.
    pub fn insert(&mut self, word: &str, vector: Vec<f32>) -> Result<(), String> {
        if vector.is_empty() {
            return Err(format!("no values for \"{word}\""));
        }
        if self.dim == 0 {
            self.dim = vector.len();
        } else if vector.len() != self.dim {
            return Err(format!(
                "\"{word}\" has {} values, expected {}",
                vector.len(),
                self.dim
            ));
        }
        self.table.insert(word.to_lowercase(), vector);
        Ok(())
    }

    /// Vector dimension, 0 if empty.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl SimilarityModel for WordVectors {
    // Unknown words are skipped rather than averaged in as zeros.
    fn vector(&self, text: &str) -> Option<Vec<f32>> {
        let mut sum = vec![0.0f32; self.dim];
        let mut known = 0usize;
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            if let Some(v) = self.table.get(&word.to_lowercase()) {
                for (acc, x) in sum.iter_mut().zip(v) {
                    *acc += x;
                }
                known += 1;
            }
        }
        if known == 0 {
            return None;
        }
        for acc in &mut sum {
            *acc /= known as f32;
        }
        Some(sum)
    }
}
