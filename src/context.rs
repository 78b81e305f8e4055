//! # Context Memory
//!
//! Per-user short-lived record of the last matched intent's context
//! tags. Written on every classified message, readable for
//! [`CONTEXT_TTL`] (10 minutes), then treated as absent.
//!
//! Today this is a hook: the tags are stored and expire correctly but
//! nothing reads them back into classification yet — a future
//! context-aware disambiguation step would. Writes are
//! last-writer-wins per user, which is fine for advisory state.
//!
//! Expired entries for inactive users are swept opportunistically on
//! every write, so the map stays proportional to the active user set
//! instead of growing for the process lifetime.

use std::collections::HashMap;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;

use crate::config::CONTEXT_TTL;

/// One user's conversational context snapshot.
#[derive(Debug, Clone)]
struct ContextEntry {
    context: Vec<String>,
    timestamp: DateTime<Utc>,
}

/// Shared, concurrent per-user context store.
#[derive(Default)]
pub struct ContextMemory {
    entries: RwLock<HashMap<String, ContextEntry>>,
}

impl ContextMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn ttl() -> ChronoDuration {
        ChronoDuration::from_std(CONTEXT_TTL).unwrap_or_else(|_| ChronoDuration::seconds(600))
    }

    /// Overwrites the user's context with the tags of the intent that
    /// just fired, and sweeps entries past their TTL.
    pub fn set(&self, user_id: &str, tags: &[&str]) {
        let now = Utc::now();
        let ttl = Self::ttl();
        let mut entries = self.entries.write();
        entries.retain(|_, e| now - e.timestamp <= ttl);
        entries.insert(
            user_id.to_string(),
            ContextEntry {
                context: tags.iter().map(|t| t.to_string()).collect(),
                timestamp: now,
            },
        );
    }

    /// Returns the user's context tags if written within the TTL.
    pub fn get(&self, user_id: &str) -> Option<Vec<String>> {
        let entries = self.entries.read();
        let entry = entries.get(user_id)?;
        if Utc::now() - entry.timestamp > Self::ttl() {
            return None;
        }
        Some(entry.context.clone())
    }

    /// Number of tracked users (expired entries included until the next
    /// write sweeps them).
    pub fn tracked_users(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mem = ContextMemory::new();
        mem.set("u1", &["weather"]);
        assert_eq!(mem.get("u1"), Some(vec!["weather".to_string()]));
    }

    #[test]
    fn missing_user_is_none() {
        let mem = ContextMemory::new();
        assert_eq!(mem.get("nobody"), None);
    }

    #[test]
    fn later_write_wins() {
        let mem = ContextMemory::new();
        mem.set("u1", &["weather"]);
        mem.set("u1", &["marketplace"]);
        assert_eq!(mem.get("u1"), Some(vec!["marketplace".to_string()]));
    }

    #[test]
    fn expired_entry_reads_as_absent() {
        let mem = ContextMemory::new();
        mem.set("u1", &["weather"]);
        // Age the entry past the TTL by rewriting its timestamp
        {
            let mut entries = mem.entries.write();
            let entry = entries.get_mut("u1").unwrap();
            entry.timestamp = Utc::now() - ChronoDuration::seconds(601);
        }
        assert_eq!(mem.get("u1"), None);
    }

    #[test]
    fn write_sweeps_expired_entries() {
        let mem = ContextMemory::new();
        mem.set("stale", &["greeting"]);
        {
            let mut entries = mem.entries.write();
            let entry = entries.get_mut("stale").unwrap();
            entry.timestamp = Utc::now() - ChronoDuration::seconds(700);
        }
        mem.set("fresh", &["help"]);
        assert_eq!(mem.tracked_users(), 1);
        assert_eq!(mem.get("fresh"), Some(vec!["help".to_string()]));
    }
}
