//! Compute Collaborator
//!
//! Producer of analysis results on a cache and database miss. Only a neutral
//! placeholder ships; a model-backed engine plugs in behind the same trait.

use async_trait::async_trait;

use crate::error::ComputeError;
use crate::models::{
    EmotionResult, NerResult, PosResult, ResultSource, SentimentLabel, SentimentResult,
    TranslationResult,
};

#[async_trait]
pub trait NlpEngine: Send + Sync + std::fmt::Debug {
    async fn recognize_entities(&self, sentence: &str, language: &str)
        -> Result<NerResult, ComputeError>;

    async fn tag_parts_of_speech(&self, sentence: &str, language: &str)
        -> Result<PosResult, ComputeError>;

    async fn analyze_sentiment(&self, text: &str, language: &str)
        -> Result<SentimentResult, ComputeError>;

    async fn detect_emotion(&self, text: &str, language: &str)
        -> Result<EmotionResult, ComputeError>;

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslationResult, ComputeError>;
}

// == Placeholder Engine ==
/// Returns empty or neutral results tagged `placeholder`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderEngine;

#[async_trait]
impl NlpEngine for PlaceholderEngine {
    async fn recognize_entities(
        &self,
        _sentence: &str,
        _language: &str,
    ) -> Result<NerResult, ComputeError> {
        Ok(NerResult {
            entities: Vec::new(),
            source: ResultSource::Placeholder,
        })
    }

    async fn tag_parts_of_speech(
        &self,
        _sentence: &str,
        _language: &str,
    ) -> Result<PosResult, ComputeError> {
        Ok(PosResult {
            tags: Vec::new(),
            source: ResultSource::Placeholder,
        })
    }

    async fn analyze_sentiment(
        &self,
        _text: &str,
        _language: &str,
    ) -> Result<SentimentResult, ComputeError> {
        Ok(SentimentResult {
            label: SentimentLabel::Neutral,
            score: 0.0,
            source: ResultSource::Placeholder,
        })
    }

    async fn detect_emotion(
        &self,
        _text: &str,
        _language: &str,
    ) -> Result<EmotionResult, ComputeError> {
        Ok(EmotionResult {
            emotion: "neutral".to_string(),
            confidence: 0.0,
            source: ResultSource::Placeholder,
        })
    }

    async fn translate(
        &self,
        _text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslationResult, ComputeError> {
        Ok(TranslationResult {
            translated_text: String::new(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            confidence: 0.0,
            source: ResultSource::Placeholder,
        })
    }
}
