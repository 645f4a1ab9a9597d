//! Engine configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// What to do when the intent classifier is unsure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LowConfidencePolicy {
    /// Act on the best guess anyway.
    #[default]
    Act,
    /// Report the command as unrecognized.
    Reject,
}

/// What to do when a back command resolves to zero or fewer pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackCountPolicy {
    /// Go back one page.
    #[default]
    Clamp,
    /// Refuse the command.
    Reject,
}

impl BackCountPolicy {
    /// Turn a resolved page count into a positive one, or refuse it.
    pub fn apply(&self, count: i64) -> EngineResult<usize> {
        if count >= 1 {
            return Ok(usize::try_from(count).unwrap_or(usize::MAX));
        }
        match self {
            Self::Clamp => Ok(1),
            Self::Reject => Err(EngineError::InvalidArgument(format!(
                "cannot go back {count} page(s)"
            ))),
        }
    }
}

/// Settings for the `generate` command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Whether generation is available at all.
    pub enabled: bool,
    /// How many summary words to use as the prompt.
    pub prompt_words: usize,
    /// Upper bound on generated tokens per sample.
    pub max_new_tokens: usize,
    /// How many samples to generate.
    pub samples: usize,
    /// RNG seed for the generator.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prompt_words: 25,
            max_new_tokens: 40,
            samples: 3,
            seed: 42,
        }
    }
}

/// Configuration for a game.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fuzzy similarity a near-miss title must exceed to be offered as a correction.
    pub acceptance_threshold: f64,
    /// Behaviour for low-confidence classifications.
    pub low_confidence: LowConfidencePolicy,
    /// Confidence below which a classification counts as low.
    pub min_confidence: f64,
    /// Behaviour for non-positive back counts.
    pub back_count: BackCountPolicy,
    /// Text generation settings.
    pub generator: GeneratorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.8,
            low_confidence: LowConfidencePolicy::Act,
            min_confidence: 0.35,
            back_count: BackCountPolicy::Clamp,
            generator: GeneratorConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys take their defaults and the
    /// acceptance threshold is clamped to 0-1.
    pub fn from_toml_str(toml: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(toml)?;
        let threshold = config.acceptance_threshold;
        Ok(config.with_acceptance_threshold(threshold))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Set the fuzzy acceptance threshold (clamped to 0-1).
    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the low-confidence policy and its cutoff.
    pub fn with_low_confidence(mut self, policy: LowConfidencePolicy, min_confidence: f64) -> Self {
        self.low_confidence = policy;
        self.min_confidence = min_confidence;
        self
    }

    /// Set the back-count policy.
    pub fn with_back_count(mut self, policy: BackCountPolicy) -> Self {
        self.back_count = policy;
        self
    }

    /// Set the generator settings.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }
}
