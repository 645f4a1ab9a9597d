//! Command resolution: shorthand or free text to an intent and argument.

use tracing::debug;
use wk_core::Intent;
use wk_models::{Classification, IntentClassifier};

use crate::config::{EngineConfig, LowConfidencePolicy};
use crate::error::{EngineError, EngineResult};
use crate::extract::{Argument, ArgumentExtractor};

/// How a command was recognized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandSource {
    /// A shorthand code such as `v` or `hs`.
    Shorthand,
    /// Free text run through the classifier.
    FreeText(Classification),
}

/// A command ready to be applied to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCommand {
    /// What to do.
    pub intent: Intent,
    /// The intent's argument, if it takes one.
    pub argument: Option<Argument>,
    /// How the command was recognized.
    pub source: CommandSource,
}

/// Turns input lines into commands without touching any session.
pub struct CommandResolver {
    classifier: Box<dyn IntentClassifier>,
    extractor: ArgumentExtractor,
    low_confidence: LowConfidencePolicy,
    min_confidence: f64,
}

impl CommandResolver {
    /// Create a resolver around a classifier.
    pub fn new(classifier: Box<dyn IntentClassifier>, config: &EngineConfig) -> EngineResult<Self> {
        Ok(Self {
            classifier,
            extractor: ArgumentExtractor::new(config.back_count)?,
            low_confidence: config.low_confidence,
            min_confidence: config.min_confidence,
        })
    }

    /// The argument extractor in use.
    pub fn extractor(&self) -> &ArgumentExtractor {
        &self.extractor
    }

    /// Resolve one input line against the current article's links.
    pub fn resolve(&self, line: &str, links: &[String]) -> EngineResult<ResolvedCommand> {
        let line = line.trim();
        if line.is_empty() {
            return Err(EngineError::EmptyCommand);
        }

        let (code, rest) = match line.split_once(char::is_whitespace) {
            Some((code, rest)) => (code, rest.trim()),
            None => (line, ""),
        };
        if let Some(intent) = Intent::from_shorthand(code) {
            return Ok(ResolvedCommand {
                intent,
                argument: shorthand_argument(intent, rest)?,
                source: CommandSource::Shorthand,
            });
        }

        let classification = self.classifier.classify(line);
        debug!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "classified free text"
        );
        if self.low_confidence == LowConfidencePolicy::Reject
            && classification.confidence < self.min_confidence
        {
            return Err(EngineError::Unrecognized {
                input: line.to_string(),
                intent: classification.intent,
                confidence: classification.confidence,
            });
        }

        let argument = self
            .extractor
            .extract(classification.intent, line, links)?;
        Ok(ResolvedCommand {
            intent: classification.intent,
            argument,
            source: CommandSource::FreeText(classification),
        })
    }
}

fn shorthand_argument(intent: Intent, rest: &str) -> EngineResult<Option<Argument>> {
    match intent {
        Intent::Visit if rest.is_empty() => Err(EngineError::InvalidArgument(
            "visit needs a title, e.g. `v Canada`".to_string(),
        )),
        Intent::Visit => Ok(Some(Argument::Title(rest.to_string()))),
        Intent::Back if rest.is_empty() => Ok(Some(Argument::Count(1))),
        Intent::Back => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Some(Argument::Count(n))),
            _ => Err(EngineError::InvalidArgument(format!(
                "`b` takes a positive number of pages, got \"{rest}\""
            ))),
        },
        _ => Ok(None),
    }
}
