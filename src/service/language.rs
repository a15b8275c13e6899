//! Language Data Service
//!
//! Read operations go through the cache-aside orchestrator; write paths
//! bypass the cache and persist directly.

use std::sync::Arc;

use serde_json::json;

use crate::cache::{truncate_for_key, StoreAdapter};
use crate::error::{PersistenceError, Result, ServiceError};
use crate::events::EventEmitter;
use crate::models::{
    AnalyzeRequest, EmotionResult, NerAnnotation, NerResult, PosResult, QuestionSubmission,
    ResultSource, SentenceList, SentencesQuery, SentimentResult, SpeechRecording,
    SubmissionResponse, TranslateRequest, TranslationResult, TranslationSubmission,
};
use crate::service::cache_aside::{CacheAside, CacheRequest};
use crate::service::engine::NlpEngine;
use crate::service::policy::Operation;
use crate::service::rate_limit::SubmissionRateLimiter;
use crate::service::repository::Repository;

#[derive(Debug, Clone)]
pub struct LanguageService {
    cache: CacheAside,
    repository: Arc<dyn Repository>,
    engine: Arc<dyn NlpEngine>,
    limiter: Arc<SubmissionRateLimiter>,
    emitter: EventEmitter,
}

impl LanguageService {
    pub fn new(
        cache: CacheAside,
        repository: Arc<dyn Repository>,
        engine: Arc<dyn NlpEngine>,
        limiter: Arc<SubmissionRateLimiter>,
        emitter: EventEmitter,
    ) -> Self {
        Self {
            cache,
            repository,
            engine,
            limiter,
            emitter,
        }
    }

    pub fn adapter(&self) -> &StoreAdapter {
        self.cache.adapter()
    }

    pub fn limiter(&self) -> &Arc<SubmissionRateLimiter> {
        &self.limiter
    }

    // == Reads ==
    /// Sentences awaiting annotation in `language`.
    pub async fn ner_sentences(&self, query: &SentencesQuery) -> Result<SentenceList> {
        if query.language.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("language cannot be empty".into()));
        }
        let limit = query.effective_limit();
        if query.limit.is_some_and(|asked| asked != limit) {
            self.emitter.warn(
                "Sentence limit clamped",
                json!({ "requested": query.limit, "limit": limit, "userId": query.user_id }),
            );
        }
        let request = CacheRequest::new(Operation::NerSentences)
            .param("languageCode", query.language.as_str())
            .param("limit", limit)
            .user(query.user_id.as_deref());

        self.cache
            .fetch(
                &request,
                || async {
                    let sentences = self.repository.list_sentences(&query.language, limit).await?;
                    // An empty listing is not worth caching as a database result
                    Ok::<_, PersistenceError>((!sentences.is_empty()).then_some(SentenceList {
                        sentences,
                        source: ResultSource::Database,
                    }))
                },
                || async {
                    Ok(SentenceList {
                        sentences: Vec::new(),
                        source: ResultSource::Placeholder,
                    })
                },
            )
            .await
    }

    pub async fn analyze_ner(&self, req: &AnalyzeRequest) -> Result<NerResult> {
        let request = self.analysis_request(Operation::NerAnalysis, req)?;
        self.cache
            .fetch(
                &request,
                || self.repository.find_validated_ner(&req.text, &req.language),
                || self.engine.recognize_entities(&req.text, &req.language),
            )
            .await
    }

    pub async fn pos_tag(&self, req: &AnalyzeRequest) -> Result<PosResult> {
        let request = self.analysis_request(Operation::PosTagging, req)?;
        self.cache
            .fetch(
                &request,
                || self.repository.find_validated_pos(&req.text, &req.language),
                || self.engine.tag_parts_of_speech(&req.text, &req.language),
            )
            .await
    }

    pub async fn analyze_sentiment(&self, req: &AnalyzeRequest) -> Result<SentimentResult> {
        let request = self.analysis_request(Operation::SentimentAnalysis, req)?;
        self.cache
            .fetch(
                &request,
                || self.repository.find_validated_sentiment(&req.text, &req.language),
                || self.engine.analyze_sentiment(&req.text, &req.language),
            )
            .await
    }

    pub async fn detect_emotion(&self, req: &AnalyzeRequest) -> Result<EmotionResult> {
        let request = self.analysis_request(Operation::EmotionDetection, req)?;
        self.cache
            .fetch(
                &request,
                || self.repository.find_validated_emotion(&req.text, &req.language),
                || self.engine.detect_emotion(&req.text, &req.language),
            )
            .await
    }

    pub async fn translate(&self, req: &TranslateRequest) -> Result<TranslationResult> {
        if let Some(message) = req.validate() {
            return Err(ServiceError::InvalidRequest(message));
        }
        self.emitter.scan_text(
            &req.text,
            json!({ "operation": Operation::Translation.name(), "userId": req.user_id }),
        );

        let request = CacheRequest::new(Operation::Translation)
            .param("text", truncate_for_key(&req.text))
            .param("sourceLanguage", req.source_language.as_str())
            .param("targetLanguage", req.target_language.as_str())
            .user(req.user_id.as_deref());

        self.cache
            .fetch(
                &request,
                || {
                    self.repository.find_validated_translation(
                        &req.text,
                        &req.source_language,
                        &req.target_language,
                    )
                },
                || {
                    self.engine
                        .translate(&req.text, &req.source_language, &req.target_language)
                },
            )
            .await
    }

    /// Validates, scans the free text and builds the shared key shape of the
    /// four analysis operations.
    fn analysis_request(&self, operation: Operation, req: &AnalyzeRequest) -> Result<CacheRequest> {
        if let Some(message) = req.validate() {
            return Err(ServiceError::InvalidRequest(message));
        }
        self.emitter.scan_text(
            &req.text,
            json!({ "operation": operation.name(), "userId": req.user_id }),
        );
        Ok(CacheRequest::new(operation)
            .param("text", truncate_for_key(&req.text))
            .param("language", req.language.as_str())
            .user(req.user_id.as_deref()))
    }

    // == Writes ==
    pub async fn save_ner_annotation(&self, annotation: &NerAnnotation) -> Result<SubmissionResponse> {
        self.admit(annotation.user_id.as_deref(), annotation.validate()).await?;
        self.emitter.scan_text(
            &annotation.sentence,
            json!({ "operation": "save_ner_annotation", "userId": annotation.user_id }),
        );
        let id = self.repository.insert_ner_annotation(annotation).await;
        self.acknowledge(
            id,
            "NER annotation",
            "Failed to save NER annotation",
            "ner_annotations",
            annotation.user_id.as_deref(),
        )
        .await
    }

    pub async fn submit_translation(
        &self,
        submission: &TranslationSubmission,
    ) -> Result<SubmissionResponse> {
        self.admit(submission.user_id.as_deref(), submission.validate()).await?;
        self.emitter.scan_text(
            &submission.translated_text,
            json!({ "operation": "submit_translation", "userId": submission.user_id }),
        );
        let id = self.repository.insert_translation(submission).await;
        self.acknowledge(
            id,
            "Translation",
            "Failed to submit translation",
            "translations",
            submission.user_id.as_deref(),
        )
        .await
    }

    pub async fn save_speech_recording(
        &self,
        recording: &SpeechRecording,
    ) -> Result<SubmissionResponse> {
        self.admit(recording.user_id.as_deref(), recording.validate()).await?;
        let id = self.repository.insert_speech_recording(recording).await;
        self.acknowledge(
            id,
            "Speech recording",
            "Failed to save speech recording",
            "speech_recordings",
            recording.user_id.as_deref(),
        )
        .await
    }

    pub async fn submit_question(&self, question: &QuestionSubmission) -> Result<SubmissionResponse> {
        self.admit(question.user_id.as_deref(), question.validate()).await?;
        self.emitter.scan_text(
            &question.question,
            json!({ "operation": "submit_question", "userId": question.user_id }),
        );
        if question.email.is_some() {
            self.emitter.gdpr(
                "contact_email_collected",
                json!({ "email": question.email, "userId": question.user_id }),
            );
        }
        let id = self.repository.insert_question(question).await;
        self.acknowledge(
            id,
            "Question",
            "Failed to submit question",
            "questions",
            question.user_id.as_deref(),
        )
        .await
    }

    /// Input validation, then the per-caller cooldown. Callers without a
    /// user id are not limited.
    async fn admit(&self, user_id: Option<&str>, invalid: Option<String>) -> Result<()> {
        if let Some(message) = invalid {
            return Err(ServiceError::InvalidRequest(message));
        }
        self.limiter.check(user_id).await.map_err(|retry_after| {
            self.emitter.security(
                "Submission rate limit exceeded",
                json!({ "userId": user_id, "retryAfterMs": retry_after.as_millis() as u64 }),
            );
            ServiceError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            }
        })
    }

    /// Failed inserts give the caller's cooldown slot back.
    async fn acknowledge(
        &self,
        inserted: std::result::Result<i64, PersistenceError>,
        what: &str,
        failure: &str,
        table: &str,
        user_id: Option<&str>,
    ) -> Result<SubmissionResponse> {
        match inserted {
            Ok(id) => {
                self.emitter.database("insert", table, json!({ "id": id }));
                self.emitter
                    .user_activity(&format!("{table}_submitted"), user_id, json!({ "id": id }));
                Ok(SubmissionResponse::new(id, what))
            }
            Err(e) => {
                self.limiter.release(user_id).await;
                self.emitter
                    .error(failure, &e, json!({ "table": table, "userId": user_id }));
                Err(ServiceError::persistence(failure, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventCategory, LogLevel, MemorySink};
    use crate::models::Entity;
    use crate::service::engine::PlaceholderEngine;
    use crate::service::repository::InMemoryRepository;
    use std::time::Duration;

    struct Fixture {
        service: LanguageService,
        repository: Arc<InMemoryRepository>,
        sink: Arc<MemorySink>,
    }

    fn fixture(cooldown: Duration) -> Fixture {
        let sink = Arc::new(MemorySink::new());
        let emitter = EventEmitter::new(sink.clone());
        let repository = Arc::new(InMemoryRepository::new());
        let cache = CacheAside::new(StoreAdapter::in_memory(emitter.clone()), emitter.clone());
        let service = LanguageService::new(
            cache,
            repository.clone(),
            Arc::new(PlaceholderEngine),
            Arc::new(SubmissionRateLimiter::new(cooldown)),
            emitter,
        );
        Fixture {
            service,
            repository,
            sink,
        }
    }

    fn analyze(text: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            text: text.to_string(),
            language: "hi".to_string(),
            user_id: Some("user_1234567890".to_string()),
        }
    }

    fn annotation(user: &str) -> NerAnnotation {
        NerAnnotation {
            sentence_id: None,
            sentence: "Ravi lives in Pune".to_string(),
            language: "en".to_string(),
            entities: vec![Entity {
                text: "Pune".to_string(),
                label: "LOC".to_string(),
                start: 14,
                end: 18,
            }],
            user_id: Some(user.to_string()),
        }
    }

    #[tokio::test]
    async fn test_analysis_placeholder_then_hit() {
        let f = fixture(Duration::ZERO);

        let first = f.service.analyze_sentiment(&analyze("अच्छा दिन")).await.unwrap();
        let second = f.service.analyze_sentiment(&analyze("अच्छा दिन")).await.unwrap();

        assert_eq!(first.source, ResultSource::Placeholder);
        assert_eq!(second.source, ResultSource::Placeholder);
        let actions: Vec<_> = f
            .sink
            .by_category(EventCategory::Cache)
            .iter()
            .filter_map(|e| e.field("action").map(str::to_string))
            .collect();
        assert_eq!(actions, vec!["MISS", "SET", "HIT"]);
    }

    #[tokio::test]
    async fn test_validated_annotation_served_from_database() {
        let f = fixture(Duration::ZERO);
        let saved = f.service.save_ner_annotation(&annotation("user_a")).await.unwrap();
        f.repository.validate_ner_annotation(saved.id).await;

        let mut req = analyze("Ravi lives in Pune");
        req.language = "en".to_string();
        let result = f.service.analyze_ner(&req).await.unwrap();

        assert_eq!(result.source, ResultSource::Database);
        assert_eq!(result.entities.len(), 1);
    }

    #[tokio::test]
    async fn test_sentences_from_database() {
        let f = fixture(Duration::ZERO);
        f.repository.add_sentence("राम घर गया", "hi").await;

        let query = SentencesQuery {
            language: "hi".to_string(),
            limit: None,
            user_id: None,
        };
        let list = f.service.ner_sentences(&query).await.unwrap();

        assert_eq!(list.source, ResultSource::Database);
        assert_eq!(list.sentences.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_text_is_invalid() {
        let f = fixture(Duration::ZERO);
        let err = f.service.pos_tag(&analyze("  ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_age_disclosure_is_flagged() {
        let f = fixture(Duration::ZERO);
        f.service
            .detect_emotion(&analyze("I am 34 years old and happy today"))
            .await
            .unwrap();

        let flagged = f.sink.by_category(EventCategory::SensitiveData);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].field("snippet"), Some("I am 34 years old an..."));
    }

    #[tokio::test]
    async fn test_save_failure_logs_once() {
        let f = fixture(Duration::ZERO);
        f.repository.set_available(false);

        let err = f
            .service
            .save_ner_annotation(&annotation("user_a"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to save NER annotation");
        assert_eq!(f.sink.count_level(LogLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_repeat_submission_is_rate_limited() {
        let f = fixture(Duration::from_secs(60));

        assert!(f.service.save_ner_annotation(&annotation("user_a")).await.is_ok());
        let err = f
            .service
            .save_ner_annotation(&annotation("user_a"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::RateLimited { .. }));

        assert!(f.service.save_ner_annotation(&annotation("user_b")).await.is_ok());
    }

    fn question(user_id: Option<&str>) -> QuestionSubmission {
        QuestionSubmission {
            question: "Which script should Konkani use?".to_string(),
            language: Some("kok".to_string()),
            email: None,
            user_id: user_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_anonymous_submissions_do_not_share_a_cooldown() {
        let f = fixture(Duration::from_secs(60));

        assert!(f.service.submit_question(&question(None)).await.is_ok());
        assert!(f.service.submit_question(&question(None)).await.is_ok());
        assert_eq!(f.repository.question_count().await, 2);
        assert!(f.sink.by_category(EventCategory::Security).is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_does_not_start_cooldown() {
        let f = fixture(Duration::from_secs(60));
        f.repository.set_available(false);

        let err = f.service.submit_question(&question(Some("user_a"))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Persistence { .. }));

        f.repository.set_available(true);
        assert!(f.service.submit_question(&question(Some("user_a"))).await.is_ok());

        let err = f.service.submit_question(&question(Some("user_a"))).await.unwrap_err();
        assert!(matches!(err, ServiceError::RateLimited { .. }));
        assert_eq!(f.repository.question_count().await, 1);
    }

    #[tokio::test]
    async fn test_oversized_sentence_limit_warns() {
        let f = fixture(Duration::ZERO);
        let query = SentencesQuery {
            language: "hi".to_string(),
            limit: Some(5000),
            user_id: Some("user_1234567890".to_string()),
        };

        f.service.ner_sentences(&query).await.unwrap();

        let warnings: Vec<_> = f
            .sink
            .events()
            .into_iter()
            .filter(|e| e.level == LogLevel::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, EventCategory::General);
        assert_eq!(warnings[0].metadata["limit"], 100);
        assert_eq!(warnings[0].field("userId"), Some("user_1****7890"));
    }

    #[tokio::test]
    async fn test_database_read_records_data_access() {
        let f = fixture(Duration::ZERO);
        f.repository.add_sentence("राम घर गया", "hi").await;
        let query = SentencesQuery {
            language: "hi".to_string(),
            limit: None,
            user_id: Some("user_1234567890".to_string()),
        };

        f.service.ner_sentences(&query).await.unwrap();

        let access = f.sink.by_category(EventCategory::DataAccess);
        assert_eq!(access.len(), 1);
        assert_eq!(access[0].field("action"), Some("read"));
        assert_eq!(access[0].field("userId"), Some("user_1****7890"));
    }

    #[tokio::test]
    async fn test_question_submission_persists() {
        let f = fixture(Duration::ZERO);
        let question = QuestionSubmission {
            question: "How do I label dates?".to_string(),
            language: Some("en".to_string()),
            email: Some("priya@example.com".to_string()),
            user_id: None,
        };

        let ack = f.service.submit_question(&question).await.unwrap();
        assert_eq!(ack.message, "Question saved successfully");
        assert_eq!(f.repository.question_count().await, 1);
        assert_eq!(f.sink.by_category(EventCategory::Gdpr).len(), 1);
    }
}
