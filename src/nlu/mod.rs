//! # NLU — Intent Matching
//!
//! The chatbot's language understanding is deliberately small: one
//! TF-IDF vector space fitted over the pattern corpus at startup, and
//! cosine-similarity scoring per query. No model downloads, no
//! per-request fitting, no mutable state after construction.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`tfidf`] | fit/transform the bounded vector space |
//! | [`classifier`] | per-intent max scoring + declaration-order tie-break |

pub mod classifier;
pub mod tfidf;

pub use classifier::{Classification, IntentClassifier};
