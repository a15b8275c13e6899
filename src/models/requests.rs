//! Request DTOs
//!
//! Inputs of the read operations and records accepted by the write paths.

use serde::{Deserialize, Serialize};

use super::results::Entity;

/// Default page size of sentence listings
pub const DEFAULT_SENTENCE_LIMIT: usize = 20;

/// Largest page a caller may ask for
pub const MAX_SENTENCE_LIMIT: usize = 100;

fn require(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{field} cannot be empty"))
    } else {
        None
    }
}

/// Query of the sentence listing (GET /api/ner/sentences)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentencesQuery {
    pub language: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl SentencesQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SENTENCE_LIMIT)
            .clamp(1, MAX_SENTENCE_LIMIT)
    }
}

/// Body of the NER, POS, sentiment and emotion analysis endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(alias = "sentence")]
    pub text: String,
    pub language: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl AnalyzeRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        require("text", &self.text).or_else(|| require("language", &self.language))
    }
}

/// Body of POST /api/translation/translate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TranslateRequest {
    pub fn validate(&self) -> Option<String> {
        require("text", &self.text)
            .or_else(|| require("sourceLanguage", &self.source_language))
            .or_else(|| require("targetLanguage", &self.target_language))
    }
}

/// Entity annotation of one sentence by a contributor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NerAnnotation {
    #[serde(default)]
    pub sentence_id: Option<i64>,
    pub sentence: String,
    pub language: String,
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl NerAnnotation {
    pub fn validate(&self) -> Option<String> {
        require("sentence", &self.sentence)
            .or_else(|| require("language", &self.language))
            .or_else(|| {
                let len = self.sentence.chars().count();
                self.entities
                    .iter()
                    .find(|e| e.start >= e.end || e.end > len)
                    .map(|e| format!("entity '{}' has an invalid span", e.label))
            })
    }
}

/// Contributed translation of a source text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationSubmission {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
    pub translated_text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TranslationSubmission {
    pub fn validate(&self) -> Option<String> {
        require("sourceText", &self.source_text)
            .or_else(|| require("translatedText", &self.translated_text))
            .or_else(|| require("sourceLanguage", &self.source_language))
            .or_else(|| require("targetLanguage", &self.target_language))
    }
}

/// Metadata of an uploaded speech recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecording {
    #[serde(default)]
    pub sentence_id: Option<i64>,
    pub language: String,
    pub audio_url: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl SpeechRecording {
    pub fn validate(&self) -> Option<String> {
        require("language", &self.language)
            .or_else(|| require("audioUrl", &self.audio_url))
            .or_else(|| (self.duration_ms == 0).then(|| "durationMs must be positive".to_string()))
    }
}

/// Question sent through the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSubmission {
    pub question: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl QuestionSubmission {
    pub fn validate(&self) -> Option<String> {
        require("question", &self.question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_accepts_sentence_alias() {
        let json = r#"{"sentence": "राम घर गया", "language": "hi"}"#;
        let req: AnalyzeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.text, "राम घर गया");
        assert!(req.user_id.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_analyze_request_rejects_blank_text() {
        let req = AnalyzeRequest {
            text: "   ".to_string(),
            language: "hi".to_string(),
            user_id: None,
        };
        assert_eq!(req.validate().as_deref(), Some("text cannot be empty"));
    }

    #[test]
    fn test_sentences_limit_is_clamped() {
        let query: SentencesQuery = serde_json::from_str(r#"{"language":"hi"}"#).unwrap();
        assert_eq!(query.effective_limit(), DEFAULT_SENTENCE_LIMIT);

        let query: SentencesQuery =
            serde_json::from_str(r#"{"language":"hi","limit":5000}"#).unwrap();
        assert_eq!(query.effective_limit(), MAX_SENTENCE_LIMIT);
    }

    #[test]
    fn test_annotation_span_validation() {
        let mut annotation = NerAnnotation {
            sentence_id: Some(1),
            sentence: "Ravi lives in Pune".to_string(),
            language: "en".to_string(),
            entities: vec![Entity {
                text: "Pune".to_string(),
                label: "LOC".to_string(),
                start: 14,
                end: 18,
            }],
            user_id: None,
        };
        assert!(annotation.validate().is_none());

        annotation.entities[0].end = 40;
        assert!(annotation.validate().unwrap().contains("invalid span"));
    }

    #[test]
    fn test_speech_recording_requires_duration() {
        let rec = SpeechRecording {
            sentence_id: None,
            language: "mr".to_string(),
            audio_url: "s3://bucket/clip.webm".to_string(),
            duration_ms: 0,
            user_id: None,
        };
        assert!(rec.validate().is_some());
    }
}
