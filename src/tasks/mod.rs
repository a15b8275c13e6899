//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cleanup: sweeps expired store entries and stale rate-limiter callers

mod cleanup;

pub use cleanup::spawn_cleanup_task;
