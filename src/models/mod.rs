//! Request, response and result models
//!
//! DTOs used for serializing/deserializing HTTP bodies and the cached
//! payloads of the read operations.

pub mod requests;
pub mod responses;
pub mod results;

// Re-export commonly used types
pub use requests::{
    AnalyzeRequest, NerAnnotation, QuestionSubmission, SentencesQuery, SpeechRecording,
    TranslateRequest, TranslationSubmission,
};
pub use responses::{HealthResponse, StatsResponse, SubmissionResponse};
pub use results::{
    EmotionResult, Entity, NerResult, PosResult, PosTag, ResultSource, Sentence, SentenceList,
    SentimentLabel, SentimentResult, Sourced, TranslationResult,
};
