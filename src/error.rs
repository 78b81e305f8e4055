//! # Error Taxonomy
//!
//! Two error families cross module boundaries:
//!
//! | Error | Raised by | Surfaced how |
//! |-------|-----------|--------------|
//! | [`ChatError`] | orchestrator input validation | client error (HTTP 422) |
//! | [`CollaboratorError`] | downstream lookups | swallowed + logged, never user-facing |
//!
//! Everything else inside the message pipeline is recovered at the
//! orchestrator boundary and converted into the fixed degraded response.

use thiserror::Error;

/// Client-facing validation errors. These are the only errors the
/// orchestrator lets out; all other failures degrade silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// Message was empty (or whitespace-only) after trimming.
    #[error("message is empty")]
    EmptyMessage,

    /// Message exceeds the service-level length cap.
    #[error("message exceeds {max} characters (got {len})")]
    MessageTooLong { len: usize, max: usize },
}

/// Failures from external collaborators (user directory, history
/// queries, document store). Callers recover locally: enrichment is
/// skipped, personalization becomes a no-op, log writes are dropped.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The requested record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The underlying document-store query failed.
    #[error("document store query failed: {0}")]
    Query(String),

    /// A collaborator call exceeded its per-turn timeout.
    #[error("collaborator call timed out")]
    Timeout,
}
