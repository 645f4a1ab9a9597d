use wk_core::Intent;

use crate::error::ModelResult;

/// The outcome of classifying one line of free text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// The most likely intent.
    pub intent: Intent,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Maps free text to exactly one intent.
pub trait IntentClassifier {
    /// Classify `text`. Always returns a member of the intent set.
    fn classify(&self, text: &str) -> Classification;
}

/// A classifier that always answers with one intent. Useful in tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticClassifier {
    intent: Intent,
    confidence: f64,
}

impl StaticClassifier {
    /// Always classify as `intent` with full confidence.
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            confidence: 1.0,
        }
    }

    /// Report `confidence` instead of 1.0.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

impl IntentClassifier for StaticClassifier {
    fn classify(&self, _text: &str) -> Classification {
        Classification {
            intent: self.intent,
            confidence: self.confidence,
        }
    }
}

/// Maps text to an embedding vector.
pub trait SimilarityModel {
    /// Embedding for `text`, or `None` if no part of it is known.
    ///
    /// Multi-word text is the element-wise average of its word vectors.
    fn vector(&self, text: &str) -> Option<Vec<f32>>;

    /// Cosine similarity of two texts, or `None` if either has no usable vector.
    fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        let a = self.vector(a)?;
        let b = self.vector(b)?;
        cosine(&a, &b)
    }
}

/// Cosine similarity; `None` when either vector has zero norm or the
/// lengths differ.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        None
    } else {
        Some(dot / (na * nb))
    }
}

/// A labelled span of text, as byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Entity label, e.g. `DATE` or `NAME`.
    pub label: String,
}

/// Split `text` into consecutive pieces, pairing each entity piece with its span.
///
/// Spans that overlap an earlier one or fall outside `text` are skipped,
/// leaving their text in the surrounding plain piece.
pub fn segments<'a>(text: &'a str, spans: &'a [EntitySpan]) -> Vec<(&'a str, Option<&'a EntitySpan>)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for span in spans {
        if span.start < offset {
            continue;
        }
        let (Some(before), Some(inner)) = (text.get(offset..span.start), text.get(span.start..span.end))
        else {
            continue;
        };
        if !before.is_empty() {
            out.push((before, None));
        }
        out.push((inner, Some(span)));
        offset = span.end;
    }
    if let Some(rest) = text.get(offset..).filter(|r| !r.is_empty()) {
        out.push((rest, None));
    }
    out
}

/// Finds named entities in text.
pub trait EntityHighlighter {
    /// Non-overlapping entity spans, ordered by start offset.
    fn entities(&self, text: &str) -> Vec<EntitySpan>;
}

/// Continues a prompt with generated text.
pub trait TextGenerator {
    /// Offer context the generator may learn from before completing.
    fn prime(&mut self, _context: &str) {}

    /// Generate at most `max_new_tokens` tokens following `prompt`.
    ///
    /// Returns only the new text, not the prompt.
    fn complete(&mut self, prompt: &str, max_new_tokens: usize) -> ModelResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_classifier_ignores_input() {
        let clf = StaticClassifier::new(Intent::Links).with_confidence(0.2);
        let c = clf.classify("anything at all");
        assert_eq!(c.intent, Intent::Links);
        assert_eq!(c.confidence, 0.2);
    }

    #[test]
    fn cosine_of_parallel_vectors() {
        let s = cosine(&[1.0, 2.0], &[2.0, 4.0]).unwrap();
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_norm() {
        assert!(cosine(&[0.0, 0.0], &[1.0, 0.0]).is_none());
        assert!(cosine(&[1.0], &[1.0, 0.0]).is_none());
    }

    fn span(start: usize, end: usize, label: &str) -> EntitySpan {
        EntitySpan {
            start,
            end,
            label: label.to_string(),
        }
    }

    #[test]
    fn segments_alternate_plain_and_entity() {
        let spans = vec![span(0, 6, "NAME"), span(19, 23, "DATE")];
        let pieces = segments("Canada was founded 1867 formally", &spans);
        let labels: Vec<(&str, Option<&str>)> = pieces
            .iter()
            .map(|(t, s)| (*t, s.map(|s| s.label.as_str())))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Canada", Some("NAME")),
                (" was founded ", None),
                ("1867", Some("DATE")),
                (" formally", None),
            ]
        );
    }

    #[test]
    fn segments_skip_bad_spans() {
        let spans = vec![span(0, 6, "NAME"), span(3, 8, "NAME"), span(10, 99, "DATE")];
        let pieces = segments("Canada is big", &spans);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[1], (" is big", None));
    }

}
