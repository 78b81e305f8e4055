//! # Intent Classifier
//!
//! Maps a free-text farmer message onto one intent from the
//! [corpus](crate::corpus) by cosine similarity in the fitted TF-IDF
//! space.
//!
//! ## Per-query algorithm
//!
//! ```text
//! message
//!   ├── 1. trim + case-fold + NFC normalise
//!   ├── 2. transform with the ALREADY-FITTED vectorizer
//!   ├── 3. cosine similarity against every pattern vector
//!   ├── 4. per intent: MAX over that intent's own patterns
//!   │      (an intent wins on its best example phrase, not an average)
//!   └── 5. pick the globally highest per-intent max
//!          ties → first intent in corpus declaration order
//! ```
//!
//! There is no confidence floor and no "unknown" intent: a message
//! sharing no vocabulary with any pattern scores 0.0 everywhere and
//! deterministically resolves to the first-declared intent. The hard
//! fallback intent exists only for pipeline failures, which the
//! orchestrator handles.

use unicode_normalization::UnicodeNormalization;

use super::tfidf::{cosine_similarity, TfidfVectorizer};
use crate::corpus::IntentDef;

/// Outcome of one classification: the winning intent and the cosine
/// similarity of its best-matching pattern, in `[0, 1]`.
pub struct Classification {
    pub intent: &'static IntentDef,
    pub confidence: f32,
}

/// Fitted classifier. Built once at startup, immutable thereafter —
/// safe for unsynchronised concurrent reads across requests.
pub struct IntentClassifier {
    corpus: &'static [IntentDef],
    vectorizer: TfidfVectorizer,
    /// One entry per pattern, in corpus declaration order:
    /// (owning intent index, l2-normalised pattern vector).
    pattern_vectors: Vec<(usize, Vec<f32>)>,
}

impl IntentClassifier {
    /// Fits one TF-IDF space across all patterns of all intents and
    /// pre-computes the pattern-vector matrix. Constructed during the
    /// explicit initialization phase and injected where needed, so
    /// tests can fit a smaller synthetic corpus.
    pub fn fit(corpus: &'static [IntentDef]) -> Self {
        let mut flat: Vec<&str> = Vec::new();
        let mut owners: Vec<usize> = Vec::new();
        for (idx, intent) in corpus.iter().enumerate() {
            for pattern in intent.patterns {
                flat.push(pattern);
                owners.push(idx);
            }
        }

        let vectorizer = TfidfVectorizer::fit(&flat);
        let pattern_vectors: Vec<(usize, Vec<f32>)> = flat
            .iter()
            .zip(owners)
            .map(|(pattern, owner)| (owner, vectorizer.transform(pattern)))
            .collect();

        // A pattern with no in-vocabulary terms can never match itself;
        // its intent would be unreachable through that phrasing
        for (pattern, (_, vector)) in flat.iter().zip(&pattern_vectors) {
            if vector.iter().all(|&v| v == 0.0) {
                tracing::warn!(pattern = %pattern, "pattern vectorizes to zero, unmatchable");
            }
        }

        tracing::info!(
            intents = corpus.len(),
            patterns = flat.len(),
            vocabulary = vectorizer.vocabulary_len(),
            "intent classifier fitted"
        );

        Self {
            corpus,
            vectorizer,
            pattern_vectors,
        }
    }

    /// Classifies a message. Total — never fails, never panics, even on
    /// empty or whitespace-only input (which vectorizes to the zero
    /// vector and resolves by the declaration-order tie-break).
    pub fn classify(&self, message: &str) -> Classification {
        let normalized: String = message.trim().to_lowercase().nfc().collect();
        let message_vector = self.vectorizer.transform(&normalized);

        // Reduce pattern scores to a per-intent maximum
        let mut intent_scores = vec![0.0f32; self.corpus.len()];
        for (owner, pattern_vector) in &self.pattern_vectors {
            let score = cosine_similarity(&message_vector, pattern_vector);
            if score > intent_scores[*owner] {
                intent_scores[*owner] = score;
            }
        }

        // Strictly-greater comparison keeps the first declared intent
        // on a total tie
        let mut best_idx = 0usize;
        let mut best_score = intent_scores[0];
        for (idx, &score) in intent_scores.iter().enumerate().skip(1) {
            if score > best_score {
                best_idx = idx;
                best_score = score;
            }
        }

        Classification {
            intent: &self.corpus[best_idx],
            confidence: best_score.clamp(0.0, 1.0),
        }
    }
}
