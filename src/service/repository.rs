//! Persistence Collaborator
//!
//! The relational store owns durable records. Reads look up human-validated
//! results by natural key; writes are inserts returning a generated id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::PersistenceError;
use crate::models::{
    EmotionResult, NerAnnotation, NerResult, PosResult, QuestionSubmission, ResultSource,
    Sentence, SentimentResult, SpeechRecording, TranslationResult, TranslationSubmission,
};

/// Relational store as seen by the operation surface.
#[async_trait]
pub trait Repository: Send + Sync + std::fmt::Debug {
    async fn list_sentences(
        &self,
        language: &str,
        limit: usize,
    ) -> Result<Vec<Sentence>, PersistenceError>;

    async fn find_validated_ner(
        &self,
        sentence: &str,
        language: &str,
    ) -> Result<Option<NerResult>, PersistenceError>;

    async fn find_validated_pos(
        &self,
        sentence: &str,
        language: &str,
    ) -> Result<Option<PosResult>, PersistenceError>;

    async fn find_validated_sentiment(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Option<SentimentResult>, PersistenceError>;

    async fn find_validated_emotion(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Option<EmotionResult>, PersistenceError>;

    async fn find_validated_translation(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<TranslationResult>, PersistenceError>;

    async fn insert_ner_annotation(&self, annotation: &NerAnnotation)
        -> Result<i64, PersistenceError>;

    async fn insert_translation(
        &self,
        submission: &TranslationSubmission,
    ) -> Result<i64, PersistenceError>;

    async fn insert_speech_recording(
        &self,
        recording: &SpeechRecording,
    ) -> Result<i64, PersistenceError>;

    async fn insert_question(&self, question: &QuestionSubmission)
        -> Result<i64, PersistenceError>;
}

// == In-Memory Repository ==
#[derive(Debug, Clone)]
struct StoredAnnotation {
    annotation: NerAnnotation,
    validated: bool,
}

#[derive(Debug, Clone)]
struct StoredTranslation {
    submission: TranslationSubmission,
    validated: bool,
}

type TextKey = (String, String);

#[derive(Debug, Default)]
struct Tables {
    sentences: Vec<Sentence>,
    ner: HashMap<i64, StoredAnnotation>,
    translations: HashMap<i64, StoredTranslation>,
    pos: HashMap<TextKey, PosResult>,
    sentiment: HashMap<TextKey, SentimentResult>,
    emotion: HashMap<TextKey, EmotionResult>,
    recordings: HashMap<i64, SpeechRecording>,
    questions: HashMap<i64, QuestionSubmission>,
}

/// Process-local stand-in for the relational store.
///
/// `set_available(false)` makes every call fail with `Unavailable`.
#[derive(Debug)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
    next_id: AtomicI64,
    available: AtomicBool,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_id: AtomicI64::new(1),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PersistenceError::Unavailable("connection refused".to_string()))
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    // == Seeding ==
    pub async fn add_sentence(&self, text: &str, language: &str) -> i64 {
        let id = self.next_id();
        self.tables.write().await.sentences.push(Sentence {
            id,
            text: text.to_string(),
            language_code: language.to_string(),
        });
        id
    }

    /// Marks a stored NER annotation as reviewed.
    pub async fn validate_ner_annotation(&self, id: i64) -> bool {
        match self.tables.write().await.ner.get_mut(&id) {
            Some(stored) => {
                stored.validated = true;
                true
            }
            None => false,
        }
    }

    /// Marks a stored translation as reviewed.
    pub async fn validate_translation(&self, id: i64) -> bool {
        match self.tables.write().await.translations.get_mut(&id) {
            Some(stored) => {
                stored.validated = true;
                true
            }
            None => false,
        }
    }

    pub async fn put_validated_pos(&self, sentence: &str, language: &str, result: PosResult) {
        self.tables
            .write()
            .await
            .pos
            .insert(text_key(sentence, language), result);
    }

    pub async fn put_validated_sentiment(&self, text: &str, language: &str, result: SentimentResult) {
        self.tables
            .write()
            .await
            .sentiment
            .insert(text_key(text, language), result);
    }

    pub async fn put_validated_emotion(&self, text: &str, language: &str, result: EmotionResult) {
        self.tables
            .write()
            .await
            .emotion
            .insert(text_key(text, language), result);
    }

    pub async fn recording_count(&self) -> usize {
        self.tables.read().await.recordings.len()
    }

    pub async fn question_count(&self) -> usize {
        self.tables.read().await.questions.len()
    }
}

fn text_key(text: &str, language: &str) -> TextKey {
    (text.to_string(), language.to_string())
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_sentences(
        &self,
        language: &str,
        limit: usize,
    ) -> Result<Vec<Sentence>, PersistenceError> {
        self.check()?;
        Ok(self
            .tables
            .read()
            .await
            .sentences
            .iter()
            .filter(|s| s.language_code == language)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_validated_ner(
        &self,
        sentence: &str,
        language: &str,
    ) -> Result<Option<NerResult>, PersistenceError> {
        self.check()?;
        let tables = self.tables.read().await;
        // Lowest id wins so repeated lookups agree
        let found = tables
            .ner
            .iter()
            .filter(|(_, s)| {
                s.validated && s.annotation.sentence == sentence && s.annotation.language == language
            })
            .min_by_key(|(id, _)| **id)
            .map(|(_, s)| NerResult {
                entities: s.annotation.entities.clone(),
                source: ResultSource::Database,
            });
        Ok(found)
    }

    async fn find_validated_pos(
        &self,
        sentence: &str,
        language: &str,
    ) -> Result<Option<PosResult>, PersistenceError> {
        self.check()?;
        Ok(self.tables.read().await.pos.get(&text_key(sentence, language)).cloned())
    }

    async fn find_validated_sentiment(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Option<SentimentResult>, PersistenceError> {
        self.check()?;
        Ok(self.tables.read().await.sentiment.get(&text_key(text, language)).cloned())
    }

    async fn find_validated_emotion(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Option<EmotionResult>, PersistenceError> {
        self.check()?;
        Ok(self.tables.read().await.emotion.get(&text_key(text, language)).cloned())
    }

    async fn find_validated_translation(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<TranslationResult>, PersistenceError> {
        self.check()?;
        let tables = self.tables.read().await;
        let found = tables
            .translations
            .iter()
            .filter(|(_, t)| {
                t.validated
                    && t.submission.source_text == text
                    && t.submission.source_language == source_language
                    && t.submission.target_language == target_language
            })
            .min_by_key(|(id, _)| **id)
            .map(|(_, t)| TranslationResult {
                translated_text: t.submission.translated_text.clone(),
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
                confidence: 1.0,
                source: ResultSource::Database,
            });
        Ok(found)
    }

    async fn insert_ner_annotation(
        &self,
        annotation: &NerAnnotation,
    ) -> Result<i64, PersistenceError> {
        self.check()?;
        let id = self.next_id();
        self.tables.write().await.ner.insert(
            id,
            StoredAnnotation {
                annotation: annotation.clone(),
                validated: false,
            },
        );
        Ok(id)
    }

    async fn insert_translation(
        &self,
        submission: &TranslationSubmission,
    ) -> Result<i64, PersistenceError> {
        self.check()?;
        let id = self.next_id();
        self.tables.write().await.translations.insert(
            id,
            StoredTranslation {
                submission: submission.clone(),
                validated: false,
            },
        );
        Ok(id)
    }

    async fn insert_speech_recording(
        &self,
        recording: &SpeechRecording,
    ) -> Result<i64, PersistenceError> {
        self.check()?;
        let id = self.next_id();
        self.tables.write().await.recordings.insert(id, recording.clone());
        Ok(id)
    }

    async fn insert_question(
        &self,
        question: &QuestionSubmission,
    ) -> Result<i64, PersistenceError> {
        self.check()?;
        let id = self.next_id();
        self.tables.write().await.questions.insert(id, question.clone());
        Ok(id)
    }
}
