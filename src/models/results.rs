//! Result types of the read operations
//!
//! Every result carries a `source` tag telling the caller where it came from.

use serde::{Deserialize, Serialize};

// == Result Source ==
/// Origin of a read result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// A human-validated record from the relational store
    Database,
    /// Neutral output of the stub producer
    Placeholder,
}

/// Results whose origin the orchestrator can stamp.
pub trait Sourced {
    fn set_source(&mut self, source: ResultSource);
    fn source(&self) -> ResultSource;
}

macro_rules! impl_sourced {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Sourced for $ty {
                fn set_source(&mut self, source: ResultSource) {
                    self.source = source;
                }

                fn source(&self) -> ResultSource {
                    self.source
                }
            }
        )*
    };
}

// == Sentences ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub id: i64,
    pub text: String,
    pub language_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceList {
    pub sentences: Vec<Sentence>,
    pub source: ResultSource,
}

// == Named Entities ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub text: String,
    /// Tag such as `PER`, `LOC`, `ORG`
    pub label: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NerResult {
    pub entities: Vec<Entity>,
    pub source: ResultSource,
}

// == Part of Speech ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosTag {
    pub token: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosResult {
    pub tags: Vec<PosTag>,
    pub source: ResultSource,
}

// == Sentiment ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
    pub source: ResultSource,
}

// == Emotion ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionResult {
    /// Dominant emotion, e.g. `joy`, `anger`, `neutral`
    pub emotion: String,
    pub confidence: f64,
    pub source: ResultSource,
}

// == Translation ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub confidence: f64,
    pub source: ResultSource,
}

impl_sourced!(
    SentenceList,
    NerResult,
    PosResult,
    SentimentResult,
    EmotionResult,
    TranslationResult,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_lowercase() {
        let result = NerResult {
            entities: vec![],
            source: ResultSource::Placeholder,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"entities":[],"source":"placeholder"}"#);
    }

    #[test]
    fn test_set_source() {
        let mut result = SentimentResult {
            label: SentimentLabel::Positive,
            score: 0.9,
            source: ResultSource::Placeholder,
        };
        result.set_source(ResultSource::Database);
        assert_eq!(result.source(), ResultSource::Database);
    }
}
