//! API Routes
//!
//! Configures the Axum router with all language-data endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    emotion_analyze_handler, health_handler, ner_analyze_handler, ner_annotation_handler,
    ner_sentences_handler, pos_analyze_handler, question_handler, sentiment_analyze_handler,
    speech_recording_handler, stats_handler, translate_handler, translation_submission_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/ner/sentences", get(ner_sentences_handler))
        .route("/ner/analyze", post(ner_analyze_handler))
        .route("/ner/annotations", post(ner_annotation_handler))
        .route("/pos/analyze", post(pos_analyze_handler))
        .route("/sentiment/analyze", post(sentiment_analyze_handler))
        .route("/emotion/analyze", post(emotion_analyze_handler))
        .route("/translation/translate", post(translate_handler))
        .route("/translation/submissions", post(translation_submission_handler))
        .route("/speech/recordings", post(speech_recording_handler))
        .route("/questions", post(question_handler));

    Router::new()
        .nest("/api", api)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
