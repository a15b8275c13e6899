//! API Module
//!
//! HTTP handlers and routing for the language-data REST API.
//!
//! # Endpoints
//! - `GET /api/ner/sentences` - Sentences awaiting annotation
//! - `POST /api/{ner,pos,sentiment,emotion}/analyze` - Cached analysis
//! - `POST /api/translation/translate` - Cached translation
//! - `POST /api/ner/annotations`, `/api/translation/submissions`,
//!   `/api/speech/recordings`, `/api/questions` - Contributions
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
