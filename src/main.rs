#![allow(dead_code)]
//! # AgriChat — Farmer Advisory Chatbot
//!
//! Entry point. Fits the intent classifier over the static pattern
//! corpus, opens the conversation log, assembles the chat engine and
//! serves the HTTP API.
//!
//! ## Startup flow
//!
//! ```text
//! main()
//!   ├── Configure tracing/logging
//!   ├── Load settings from environment
//!   ├── Fit TF-IDF classifier over the corpus (milliseconds)
//!   ├── Open conversation log (data/*.json)
//!   ├── Assemble ChatEngine + AppState + Router
//!   └── Serve on AGRICHAT_ADDR (default 0.0.0.0:8000)
//! ```
//!
//! ```bash
//! cargo run
//! RUST_LOG=debug AGRICHAT_ADDR=127.0.0.1:9000 cargo run
//! ```
//!
//! The standalone binary runs against an empty in-memory farm-data
//! store; embedded in the host application the [`collaborators::FarmData`]
//! implementation is swapped for the real document store.

/// `collaborators` module — read-only facade over the host's farm data.
mod collaborators;

/// `config` module — environment settings and pipeline constants.
mod config;

/// `context` module — per-user short-lived context memory.
mod context;

/// `corpus` module — the static intent/pattern/response table.
mod corpus;

/// `enrich` module — appends live user data to canned responses.
mod enrich;

/// `error` module — client-facing and collaborator error types.
mod error;

/// `model` module — domain records shared across the pipeline.
mod model;

/// `nlu` module — TF-IDF vectorizer and cosine intent classifier.
mod nlu;

/// `orchestrator` module — the per-message conversation pipeline.
mod orchestrator;

/// `personalize` module — placeholder substitution from user profiles.
mod personalize;

/// `store` module — append-only conversation/feedback log.
mod store;

/// `web` module — axum server, handlers and shared state.
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::collaborators::InMemoryFarmData;
use crate::config::Settings;
use crate::corpus::CORPUS;
use crate::nlu::IntentClassifier;
use crate::orchestrator::ChatEngine;
use crate::store::ConversationLog;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🌾 AgriChat — starting");

    let settings = Settings::from_env();

    // Fitting is cheap (a few hundred static patterns), so the server
    // is ready to classify before it accepts its first connection.
    let classifier = Arc::new(IntentClassifier::fit(CORPUS));

    let log = Arc::new(
        ConversationLog::open(&settings.data_dir)
            .context("opening conversation log")?,
    );

    let farm_data = Arc::new(InMemoryFarmData::new());
    let engine = Arc::new(ChatEngine::new(classifier, farm_data, Arc::clone(&log)));

    let app = web::create_router(AppState::new(engine, log));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    tracing::info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
