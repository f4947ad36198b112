//! Moderation stores: ban list and content blocklist
//!
//! Presence in the ban list overrides every other state transition: a banned
//! participant cannot enter a queue, be matched, or exchange text. The
//! blocklist is a static case-insensitive substring filter over inbound text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use pairchat_core::{ChatId, Timestamp};

// ----------------------------------------------------------------------------
// Ban List
// ----------------------------------------------------------------------------

/// A recorded ban
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanRecord {
    pub reason: Option<String>,
    pub banned_at: Timestamp,
}

/// Ban list keyed by participant id
#[derive(Debug, Default)]
pub struct BanList {
    bans: HashMap<ChatId, BanRecord>,
}

impl BanList {
    pub fn new() -> Self {
        Self {
            bans: HashMap::new(),
        }
    }

    /// Insert or overwrite a ban record. Idempotent: re-banning refreshes
    /// the reason and timestamp.
    pub fn ban(&mut self, id: ChatId, reason: Option<String>, now: Timestamp) -> &BanRecord {
        self.bans.insert(
            id,
            BanRecord {
                reason,
                banned_at: now,
            },
        );
        &self.bans[&id]
    }

    /// Remove a ban record; returns whether one was present
    pub fn unban(&mut self, id: &ChatId) -> bool {
        self.bans.remove(id).is_some()
    }

    /// Pure lookup
    pub fn is_banned(&self, id: &ChatId) -> bool {
        self.bans.contains_key(id)
    }

    /// Ban record for a participant, if any
    pub fn get(&self, id: &ChatId) -> Option<&BanRecord> {
        self.bans.get(id)
    }

    /// Insert a record as-is, used when reloading from the durable store
    pub fn insert_record(&mut self, id: ChatId, record: BanRecord) {
        self.bans.insert(id, record);
    }

    pub fn len(&self) -> usize {
        self.bans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bans.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Content Blocklist
// ----------------------------------------------------------------------------

/// Static substring blocklist, matched case-insensitively
#[derive(Debug, Default)]
pub struct Blocklist {
    words: Vec<String>,
}

impl Blocklist {
    /// Build from configured words; empty entries are dropped
    pub fn new(words: &[String]) -> Self {
        Self {
            words: words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive substring match against the blocklist. Pure, no
    /// side effects.
    pub fn contains_blocked(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.words.iter().any(|w| lower.contains(w))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
