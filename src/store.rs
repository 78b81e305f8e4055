//! # Conversation Log
//!
//! Append-only store for conversation turns and feedback votes, with
//! best-effort JSON persistence.
//!
//! ## Layout
//!
//! | File                      | Contents                          |
//! |---------------------------|-----------------------------------|
//! | `<dir>/conversations.json`| every processed exchange          |
//! | `<dir>/feedback.json`     | helpful/unhelpful votes           |
//!
//! Both files are rewritten whole on every append. Flush failures are
//! logged and swallowed: losing a history line must never fail the
//! conversation turn that produced it. Tests use [`ConversationLog::in_memory`],
//! which skips the disk entirely.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::model::{ConversationRecord, FeedbackRecord};

const CONVERSATIONS_FILE: &str = "conversations.json";
const FEEDBACK_FILE: &str = "feedback.json";

/// Shared append-only conversation and feedback store.
pub struct ConversationLog {
    conversations: RwLock<Vec<ConversationRecord>>,
    feedback: RwLock<Vec<FeedbackRecord>>,
    data_dir: Option<PathBuf>,
}

/// Aggregates served by the analytics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub total_conversations: usize,
    pub active_users_7d: usize,
    pub average_confidence: f32,
    pub intent_distribution: Vec<IntentCount>,
    pub helpful_count: usize,
    pub unhelpful_count: usize,
}

/// One row of the intent distribution, descending by count.
#[derive(Debug, Clone, Serialize)]
pub struct IntentCount {
    pub intent: String,
    pub count: usize,
}

impl ConversationLog {
    /// Opens the log rooted at `data_dir`, loading whatever history the
    /// previous run flushed. Missing or unreadable files start empty.
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        let conversations = load_or_default(&data_dir.join(CONVERSATIONS_FILE));
        let feedback = load_or_default(&data_dir.join(FEEDBACK_FILE));
        tracing::info!(
            conversations = conversations.len(),
            feedback = feedback.len(),
            dir = %data_dir.display(),
            "conversation log opened"
        );
        Ok(Self {
            conversations: RwLock::new(conversations),
            feedback: RwLock::new(feedback),
            data_dir: Some(data_dir.to_path_buf()),
        })
    }

    /// A log that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            conversations: RwLock::new(Vec::new()),
            feedback: RwLock::new(Vec::new()),
            data_dir: None,
        }
    }

    pub fn record_conversation(&self, record: ConversationRecord) {
        let snapshot = {
            let mut conversations = self.conversations.write();
            conversations.push(record);
            self.data_dir.as_ref().map(|_| conversations.clone())
        };
        if let Some(snapshot) = snapshot {
            self.flush(CONVERSATIONS_FILE, &snapshot);
        }
    }

    pub fn record_feedback(&self, record: FeedbackRecord) {
        let snapshot = {
            let mut feedback = self.feedback.write();
            feedback.push(record);
            self.data_dir.as_ref().map(|_| feedback.clone())
        };
        if let Some(snapshot) = snapshot {
            self.flush(FEEDBACK_FILE, &snapshot);
        }
    }

    /// The user's most recent exchanges, newest first, capped at `limit`.
    pub fn list_history(&self, user_id: &str, limit: usize) -> Vec<ConversationRecord> {
        let conversations = self.conversations.read();
        let mut matched: Vec<ConversationRecord> = conversations
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched.truncate(limit);
        matched
    }

    /// Deletes the user's exchanges and returns how many were removed.
    /// Feedback referencing them is kept: votes stay countable in the
    /// analytics even after the conversation text is gone.
    pub fn purge_history(&self, user_id: &str) -> usize {
        let (removed, snapshot) = {
            let mut conversations = self.conversations.write();
            let before = conversations.len();
            conversations.retain(|c| c.user_id != user_id);
            let removed = before - conversations.len();
            (removed, self.data_dir.as_ref().map(|_| conversations.clone()))
        };
        if removed > 0 {
            if let Some(snapshot) = snapshot {
                self.flush(CONVERSATIONS_FILE, &snapshot);
            }
        }
        removed
    }

    /// Usage aggregates across the whole log.
    pub fn analytics(&self) -> AnalyticsReport {
        let conversations = self.conversations.read();
        let feedback = self.feedback.read();

        let week_ago = Utc::now() - Duration::days(7);
        let active_users_7d = {
            let mut users: Vec<&str> = conversations
                .iter()
                .filter(|c| c.timestamp >= week_ago)
                .map(|c| c.user_id.as_str())
                .collect();
            users.sort_unstable();
            users.dedup();
            users.len()
        };

        let average_confidence = if conversations.is_empty() {
            0.0
        } else {
            conversations.iter().map(|c| c.confidence).sum::<f32>() / conversations.len() as f32
        };

        let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
        for record in conversations.iter() {
            *counts.entry(record.intent.as_str()).or_insert(0) += 1;
        }
        let mut intent_distribution: Vec<IntentCount> = counts
            .into_iter()
            .map(|(intent, count)| IntentCount {
                intent: intent.to_string(),
                count,
            })
            .collect();
        intent_distribution
            .sort_by(|a, b| b.count.cmp(&a.count).then(a.intent.cmp(&b.intent)));
        intent_distribution.truncate(10);

        AnalyticsReport {
            total_conversations: conversations.len(),
            active_users_7d,
            average_confidence,
            intent_distribution,
            helpful_count: feedback.iter().filter(|f| f.helpful).count(),
            unhelpful_count: feedback.iter().filter(|f| !f.helpful).count(),
        }
    }

    fn flush<T: Serialize>(&self, file: &str, records: &[T]) {
        let Some(dir) = &self.data_dir else { return };
        let path = dir.join(file);
        let result = serde_json::to_string_pretty(records)
            .context("serializing records")
            .and_then(|json| {
                fs::write(&path, json).with_context(|| format!("writing {}", path.display()))
            });
        if let Err(e) = result {
            tracing::warn!(error = %e, "conversation log flush failed, keeping in-memory copy");
        }
    }
}

fn load_or_default<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "corrupt log file, starting empty");
            Vec::new()
        }),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn record(user: &str, intent: &str, confidence: f32, age_mins: i64) -> ConversationRecord {
        ConversationRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user.to_string(),
            user_message: "hello".to_string(),
            bot_response: "Hello! How can I help?".to_string(),
            intent: intent.to_string(),
            confidence,
            timestamp: Utc::now() - Duration::minutes(age_mins),
        }
    }

    // ─── history ───────────────────────────────────────────────

    #[test]
    fn history_is_newest_first_and_capped() {
        let log = ConversationLog::in_memory();
        log.record_conversation(record("u1", "greeting", 1.0, 30));
        log.record_conversation(record("u1", "my_crops", 0.8, 10));
        log.record_conversation(record("u1", "weather_forecast", 0.6, 20));
        log.record_conversation(record("u2", "greeting", 1.0, 5));

        let history = log.list_history("u1", 2);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].intent, "my_crops");
        assert_eq!(history[1].intent, "weather_forecast");
    }

    #[test]
    fn purge_removes_only_that_user() {
        let log = ConversationLog::in_memory();
        log.record_conversation(record("u1", "greeting", 1.0, 1));
        log.record_conversation(record("u1", "help", 0.9, 2));
        log.record_conversation(record("u2", "greeting", 1.0, 3));

        assert_eq!(log.purge_history("u1"), 2);
        assert!(log.list_history("u1", 10).is_empty());
        assert_eq!(log.list_history("u2", 10).len(), 1);
        assert_eq!(log.purge_history("u1"), 0);
    }

    // ─── feedback ──────────────────────────────────────────────

    #[test]
    fn feedback_survives_history_purge() {
        let log = ConversationLog::in_memory();
        let conv = record("u1", "greeting", 1.0, 1);
        let conv_id = conv.id.clone();
        log.record_conversation(conv);
        log.record_feedback(FeedbackRecord {
            id: Uuid::new_v4().to_string(),
            conversation_id: conv_id,
            user_id: "u1".to_string(),
            helpful: true,
            comment: None,
            timestamp: Utc::now(),
        });

        log.purge_history("u1");
        let report = log.analytics();
        assert_eq!(report.helpful_count, 1);
        assert_eq!(report.total_conversations, 0);
    }

    // ─── analytics ─────────────────────────────────────────────

    #[test]
    fn analytics_aggregates_intents_and_confidence() {
        let log = ConversationLog::in_memory();
        log.record_conversation(record("u1", "greeting", 1.0, 1));
        log.record_conversation(record("u2", "greeting", 0.5, 2));
        log.record_conversation(record("u1", "my_crops", 0.9, 3));

        let report = log.analytics();
        assert_eq!(report.total_conversations, 3);
        assert_eq!(report.active_users_7d, 2);
        assert!((report.average_confidence - 0.8).abs() < 1e-6);
        assert_eq!(report.intent_distribution[0].intent, "greeting");
        assert_eq!(report.intent_distribution[0].count, 2);
    }

    #[test]
    fn empty_log_has_zeroed_report() {
        let report = ConversationLog::in_memory().analytics();
        assert_eq!(report.total_conversations, 0);
        assert_eq!(report.average_confidence, 0.0);
        assert!(report.intent_distribution.is_empty());
    }

    // ─── persistence ───────────────────────────────────────────

    #[test]
    fn reopen_reloads_flushed_history() {
        let dir = std::env::temp_dir().join(format!("agrichat-test-{}", Uuid::new_v4()));
        {
            let log = ConversationLog::open(&dir).unwrap();
            log.record_conversation(record("u1", "greeting", 1.0, 1));
        }
        let log = ConversationLog::open(&dir).unwrap();
        assert_eq!(log.list_history("u1", 10).len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }
}
