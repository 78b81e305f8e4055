//! Runtime settings and pipeline constants.
//!
//! Settings come from environment variables with sensible defaults, so
//! `cargo run` works out of the box:
//!
//! ```bash
//! AGRICHAT_ADDR=0.0.0.0:8000 AGRICHAT_DATA_DIR=data cargo run
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Hard cap on an inbound message, in characters (post-trim). Enforced
/// by the orchestrator before the classifier sees the text.
pub const MAX_MESSAGE_LEN: usize = 500;

/// How long a per-user context entry stays readable after being written.
pub const CONTEXT_TTL: Duration = Duration::from_secs(600);

/// Budget for any single external collaborator call. A slow downstream
/// dependency degrades one conversation turn, not the whole service.
pub const COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(2);

/// Environment-derived application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Directory for the JSON conversation/feedback logs.
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("AGRICHAT_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let data_dir = std::env::var("AGRICHAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        Self {
            bind_addr,
            data_dir,
        }
    }
}
