//! Service Module
//!
//! The operation surface: cached reads of the language-data collaborators,
//! direct write paths and the policies that govern both.

mod cache_aside;
mod engine;
mod language;
mod policy;
mod rate_limit;
mod repository;

pub use cache_aside::{CacheAside, CacheRequest};
pub use engine::{NlpEngine, PlaceholderEngine};
pub use language::LanguageService;
pub use policy::{Operation, TtlClass};
pub use rate_limit::SubmissionRateLimiter;
pub use repository::{InMemoryRepository, Repository};
