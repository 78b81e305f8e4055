//! # TF-IDF Vectorizer
//!
//! A fitted, immutable vector space over the corpus patterns. Word
//! n-grams of length 1–3, English stop-words removed, vocabulary capped
//! at [`MAX_FEATURES`] terms, and every vector l2-normalised so that
//! cosine similarity reduces to a dot product.
//!
//! ## Fit vs Transform
//!
//! ```text
//! fit(patterns)                    transform(message)
//!   ├── tokenize + n-grams           ├── tokenize + n-grams
//!   ├── count term/doc frequency     ├── keep only in-vocabulary terms
//!   ├── keep top-500 terms           │   (out-of-vocabulary is IGNORED —
//!   └── idf = ln((1+n)/(1+df)) + 1   │    the corpus defines the vocabulary)
//!                                    └── tf·idf, l2-normalise
//! ```
//!
//! The out-of-vocabulary behaviour is deliberate: a message sharing no
//! vocabulary with any pattern produces the zero vector, which scores
//! 0.0 against everything and resolves by the classifier's tie-break.

use std::collections::HashMap;

/// Vocabulary cap. Terms are ranked by corpus frequency (ties broken by
/// first occurrence) and the rest are discarded.
///
/// Sized so the full pattern corpus (~800 distinct terms) fits
/// without pruning: a pattern whose distinctive terms fall outside the
/// vocabulary can no longer match itself, which silently strands its
/// intent. The classifier warns at fit time if that ever happens.
pub const MAX_FEATURES: usize = 1500;

/// Common English words stripped before n-gram construction. Kept
/// deliberately small: possessives ("my", "your") and question words
/// ("what", "how") carry intent signal here and must survive.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "than", "this", "that", "these",
    "those", "to", "of", "in", "on", "at", "by", "for", "with", "about", "as", "into",
    "from", "do", "does", "did", "is", "are", "was", "were", "be", "been", "being", "am",
    "have", "has", "had", "will", "would", "can", "could", "should", "shall", "may",
    "might", "it", "its", "i", "s", "t", "lo",
];

/// Fitted TF-IDF model: vocabulary plus per-term inverse document
/// frequency. Immutable after [`fit`](TfidfVectorizer::fit) — safe for
/// unsynchronised concurrent reads.
pub struct TfidfVectorizer {
    /// term → column index.
    vocabulary: HashMap<String, usize>,
    /// Smoothed idf per column.
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fits the vector space over a document collection.
    ///
    /// Term selection follows the usual `max_features` semantics: rank
    /// terms by total corpus frequency, keep the top [`MAX_FEATURES`].
    /// The ranking tie-break is first occurrence, which keeps the fit
    /// deterministic for a fixed corpus.
    pub fn fit(documents: &[&str]) -> Self {
        let n_docs = documents.len();

        // term → (corpus frequency, document frequency, first-seen rank)
        let mut stats: HashMap<String, (u64, u64, usize)> = HashMap::new();
        let mut first_seen = 0usize;

        for doc in documents {
            let terms = extract_terms(doc);
            let mut seen_in_doc: HashMap<&str, bool> = HashMap::new();
            for term in &terms {
                let entry = stats.entry(term.clone()).or_insert_with(|| {
                    first_seen += 1;
                    (0, 0, first_seen)
                });
                entry.0 += 1;
                if seen_in_doc.insert(term, true).is_none() {
                    entry.1 += 1;
                }
            }
        }

        // Rank by frequency descending, first-seen ascending, cap.
        let mut ranked: Vec<(String, u64, u64, usize)> = stats
            .into_iter()
            .map(|(term, (tf, df, rank))| (term, tf, df, rank))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.3.cmp(&b.3)));
        ranked.truncate(MAX_FEATURES);

        let mut vocabulary = HashMap::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        for (col, (term, _tf, df, _rank)) in ranked.into_iter().enumerate() {
            vocabulary.insert(term, col);
            // Smoothed idf, sklearn-style: ln((1+n)/(1+df)) + 1
            idf.push(((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0);
        }

        Self { vocabulary, idf }
    }

    /// Vectorizes a text against the already-fitted vocabulary.
    ///
    /// Out-of-vocabulary terms are ignored. Returns a dense
    /// l2-normalised vector (the zero vector when nothing matched).
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.idf.len()];
        for term in extract_terms(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                vector[col] += self.idf[col];
            }
        }

        // l2 normalise so cosine similarity is a plain dot product
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    /// Number of terms kept in the fitted vocabulary.
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 for mismatched lengths, empty vectors, or a zero norm —
/// never panics, never divides by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Case-folds, splits on non-alphanumeric boundaries, drops stop-words,
/// then emits word n-grams of length 1–3 over the surviving tokens.
fn extract_terms(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .collect();

    let mut terms = Vec::new();
    for n in 1..=3usize {
        if tokens.len() < n {
            break;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── extract_terms ─────────────────────────────────────────

    #[test]
    fn terms_are_case_folded() {
        assert_eq!(extract_terms("HELLO There"), extract_terms("hello there"));
    }

    #[test]
    fn stop_words_removed_before_ngrams() {
        // "the" must not appear inside bigrams either
        let terms = extract_terms("water the crops");
        assert!(terms.contains(&"water crops".to_string()));
        assert!(!terms.iter().any(|t| t.contains("the")));
    }

    #[test]
    fn possessives_survive() {
        let terms = extract_terms("my crops");
        assert!(terms.contains(&"my".to_string()));
        assert!(terms.contains(&"my crops".to_string()));
    }

    #[test]
    fn empty_text_yields_no_terms() {
        assert!(extract_terms("").is_empty());
        assert!(extract_terms("   ").is_empty());
        assert!(extract_terms("the of and").is_empty());
    }

    // ─── fit / transform ───────────────────────────────────────

    #[test]
    fn identical_text_has_unit_self_similarity() {
        let v = TfidfVectorizer::fit(&["hello there", "goodbye friend"]);
        let a = v.transform("hello there");
        let b = v.transform("hello there");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_vocabulary_yields_zero_vector() {
        let v = TfidfVectorizer::fit(&["hello there"]);
        let vec = v.transform("completely unrelated words");
        assert!(vec.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn empty_message_yields_zero_vector() {
        let v = TfidfVectorizer::fit(&["hello there"]);
        assert!(v.transform("").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn vocabulary_is_capped() {
        // 2000 distinct unigrams — fit must keep at most MAX_FEATURES
        let docs: Vec<String> = (0..2000).map(|i| format!("word{i}")).collect();
        let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
        let v = TfidfVectorizer::fit(&refs);
        assert!(v.vocabulary_len() <= MAX_FEATURES);
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let v = TfidfVectorizer::fit(&["crop water", "crop neem", "crop soil"]);
        // "crop" appears in every document, "neem" in one — a message
        // containing only "neem" should align better with its source doc
        let msg = v.transform("neem");
        let doc_neem = v.transform("crop neem");
        let doc_water = v.transform("crop water");
        assert!(cosine_similarity(&msg, &doc_neem) > cosine_similarity(&msg, &doc_water));
    }

    // ─── cosine_similarity ─────────────────────────────────────

    #[test]
    fn cosine_handles_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
