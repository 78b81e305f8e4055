//! Shared state between all Axum handlers.
//!
//! Everything is constructed once in `main` before the server binds;
//! there is no background initialization phase. The classifier inside
//! the engine is immutable after fitting, so handlers share it through
//! plain `Arc`s with no locking on the hot path.

use std::sync::Arc;

use crate::orchestrator::ChatEngine;
use crate::store::ConversationLog;

/// Shared application state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ChatEngine>,
    pub log: Arc<ConversationLog>,
}

impl AppState {
    pub fn new(engine: Arc<ChatEngine>, log: Arc<ConversationLog>) -> Self {
        Self { engine, log }
    }
}
