//! API Handlers
//!
//! HTTP request handlers for each language-data endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::StoreAdapter;
use crate::config::Config;
use crate::error::Result;
use crate::events::EventEmitter;
use crate::models::{
    AnalyzeRequest, EmotionResult, HealthResponse, NerAnnotation, NerResult, PosResult,
    QuestionSubmission, SentenceList, SentencesQuery, SentimentResult, SpeechRecording,
    StatsResponse, SubmissionResponse, TranslateRequest, TranslationResult, TranslationSubmission,
};
use crate::service::{CacheAside, LanguageService, NlpEngine, Repository, SubmissionRateLimiter};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<LanguageService>,
}

impl AppState {
    pub fn new(service: LanguageService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wires the service from configuration and already-built collaborators.
    pub fn from_config(
        config: &Config,
        adapter: StoreAdapter,
        repository: Arc<dyn Repository>,
        engine: Arc<dyn NlpEngine>,
        emitter: EventEmitter,
    ) -> Self {
        let cache = CacheAside::new(adapter, emitter.clone()).with_coalescing(config.coalesce);
        let limiter = Arc::new(SubmissionRateLimiter::new(Duration::from_secs(
            config.submission_cooldown,
        )));
        Self::new(LanguageService::new(
            cache, repository, engine, limiter, emitter,
        ))
    }

    pub fn adapter(&self) -> &StoreAdapter {
        self.service.adapter()
    }
}

// == Reads ==
/// Handler for GET /api/ner/sentences
pub async fn ner_sentences_handler(
    State(state): State<AppState>,
    Query(query): Query<SentencesQuery>,
) -> Result<Json<SentenceList>> {
    Ok(Json(state.service.ner_sentences(&query).await?))
}

/// Handler for POST /api/ner/analyze
pub async fn ner_analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<NerResult>> {
    Ok(Json(state.service.analyze_ner(&req).await?))
}

/// Handler for POST /api/pos/analyze
pub async fn pos_analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<PosResult>> {
    Ok(Json(state.service.pos_tag(&req).await?))
}

/// Handler for POST /api/sentiment/analyze
pub async fn sentiment_analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<SentimentResult>> {
    Ok(Json(state.service.analyze_sentiment(&req).await?))
}

/// Handler for POST /api/emotion/analyze
pub async fn emotion_analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<EmotionResult>> {
    Ok(Json(state.service.detect_emotion(&req).await?))
}

/// Handler for POST /api/translation/translate
pub async fn translate_handler(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslationResult>> {
    Ok(Json(state.service.translate(&req).await?))
}

// == Writes ==
/// Handler for POST /api/ner/annotations
pub async fn ner_annotation_handler(
    State(state): State<AppState>,
    Json(annotation): Json<NerAnnotation>,
) -> Result<Json<SubmissionResponse>> {
    Ok(Json(state.service.save_ner_annotation(&annotation).await?))
}

/// Handler for POST /api/translation/submissions
pub async fn translation_submission_handler(
    State(state): State<AppState>,
    Json(submission): Json<TranslationSubmission>,
) -> Result<Json<SubmissionResponse>> {
    Ok(Json(state.service.submit_translation(&submission).await?))
}

/// Handler for POST /api/speech/recordings
pub async fn speech_recording_handler(
    State(state): State<AppState>,
    Json(recording): Json<SpeechRecording>,
) -> Result<Json<SubmissionResponse>> {
    Ok(Json(state.service.save_speech_recording(&recording).await?))
}

/// Handler for POST /api/questions
pub async fn question_handler(
    State(state): State<AppState>,
    Json(question): Json<QuestionSubmission>,
) -> Result<Json<SubmissionResponse>> {
    Ok(Json(state.service.submit_question(&question).await?))
}

// == Operational ==
/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let adapter = state.adapter();
    Json(StatsResponse::new(&adapter.stats(), adapter.is_connected().await))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_connected(
        state.adapter().is_connected().await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::models::ResultSource;
    use crate::service::{InMemoryRepository, PlaceholderEngine};

    fn test_state() -> AppState {
        let emitter = EventEmitter::default();
        AppState::from_config(
            &Config::default(),
            StoreAdapter::in_memory(emitter.clone()),
            Arc::new(InMemoryRepository::new()),
            Arc::new(PlaceholderEngine),
            emitter,
        )
    }

    #[tokio::test]
    async fn test_translate_then_stats() {
        let state = test_state();
        let req = TranslateRequest {
            text: "नमस्ते".to_string(),
            source_language: "hi".to_string(),
            target_language: "en".to_string(),
            user_id: None,
        };

        let first = translate_handler(State(state.clone()), Json(req.clone()))
            .await
            .unwrap();
        assert_eq!(first.source, ResultSource::Placeholder);
        translate_handler(State(state.clone()), Json(req)).await.unwrap();

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.hits, 1);
        // The single-flight re-check is a second lookup
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.sets, 1);
    }

    #[tokio::test]
    async fn test_invalid_analyze_request() {
        let state = test_state();
        let req = AnalyzeRequest {
            text: String::new(),
            language: "hi".to_string(),
            user_id: None,
        };

        let result = ner_analyze_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_degraded_health() {
        let emitter = EventEmitter::default();
        let state = AppState::from_config(
            &Config::default(),
            StoreAdapter::degraded(emitter.clone()),
            Arc::new(InMemoryRepository::new()),
            Arc::new(PlaceholderEngine),
            emitter,
        );

        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "degraded");
    }
}
