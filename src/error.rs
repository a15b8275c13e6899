//! Error types for the data access layer
//!
//! Provides unified error handling using thiserror. Store and persistence
//! failures are recoverable on read paths; `ServiceError` is what reaches
//! the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Adapter Error Enum ==
/// Failures raised by a key-value store backend.
///
/// These never cross the folding methods of `StoreAdapter`; only the
/// `try_*` methods expose them.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// No connection was established at startup
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The remote store rejected or dropped a command
    #[error("Store transport error: {0}")]
    Transport(String),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection was released at shutdown
    #[error("Store connection closed")]
    Closed,
}

// == Persistence Error Enum ==
/// Failures raised by the relational persistence collaborator.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Database could not be reached
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Query or insert failed
    #[error("Query failed: {0}")]
    Query(String),
}

// == Compute Error Enum ==
/// Failures of a result producer (placeholder or model).
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Model backend could not be reached
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// Model ran but produced no usable result
    #[error("Inference failed: {0}")]
    Failed(String),
}

// == Service Error Enum ==
/// Error type surfaced to callers of the operation surface.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Caller submitted again inside the cooldown window
    #[error("Too many submissions, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The producer of a read operation failed; nothing was cached
    #[error("Computation failed for {operation}: {reason}")]
    Computation { operation: String, reason: String },

    /// A write-path insert failed
    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        source: PersistenceError,
    },
}

impl ServiceError {
    /// Wraps a persistence failure with a domain label such as
    /// "Failed to save NER annotation".
    pub fn persistence(message: impl Into<String>, source: PersistenceError) -> Self {
        ServiceError::Persistence {
            message: message.into(),
            source,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Computation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Persistence sources may echo row data, only the label goes out
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the operation surface.
pub type Result<T> = std::result::Result<T, ServiceError>;
