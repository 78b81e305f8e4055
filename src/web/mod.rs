//! # Web Layer
//!
//! The HTTP surface of the chatbot, built with **Axum** + JSON.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Host application frontend                                  │
//! ├────────────────────────────────────────────────────────────┤
//! │ Axum Router (this module)                                  │
//! │  ├── POST   /chatbot/message   → process one turn          │
//! │  ├── GET    /chatbot/history   → recent exchanges          │
//! │  ├── DELETE /chatbot/history   → purge my exchanges        │
//! │  ├── POST   /chatbot/feedback  → helpful/unhelpful vote    │
//! │  ├── GET    /chatbot/analytics → usage report (privileged) │
//! │  └── GET    /status            → liveness + corpus stats   │
//! ├────────────────────────────────────────────────────────────┤
//! │ ChatEngine + ConversationLog (shared via AppState)         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identity travels in the `x-user-id` header (the host app fronts
//! authentication); requests without it act as `anonymous`. The
//! analytics endpoint additionally requires an `x-user-role` of
//! `admin` or `specialist`.

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

/// Builds the application router with all chatbot routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chatbot/message", post(handlers::post_message))
        .route(
            "/chatbot/history",
            get(handlers::get_history).delete(handlers::delete_history),
        )
        .route("/chatbot/feedback", post(handlers::post_feedback))
        .route("/chatbot/analytics", get(handlers::get_analytics))
        .route("/status", get(handlers::status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
