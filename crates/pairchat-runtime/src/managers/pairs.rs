//! Pair registry: the engine's session store
//!
//! A session {A, B} is held as two directed links A→B and B→A for O(1)
//! partner lookup. The relation stays symmetric and functional: each linked
//! participant maps to exactly one partner, and links are created and
//! removed in pairs within a single call, so observers never see a dangling
//! half.

use std::collections::{HashMap, HashSet};

use pairchat_core::ChatId;

/// Registry of active 1:1 sessions
#[derive(Debug, Default)]
pub struct PairRegistry {
    links: HashMap<ChatId, ChatId>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self {
            links: HashMap::new(),
        }
    }

    /// Establish the symmetric link between two unpaired participants.
    /// Returns false (and changes nothing) if either end is already linked
    /// or the ends are equal.
    pub fn link(&mut self, a: ChatId, b: ChatId) -> bool {
        if a == b || self.links.contains_key(&a) || self.links.contains_key(&b) {
            return false;
        }
        self.links.insert(a, b);
        self.links.insert(b, a);
        true
    }

    /// Tear down the session containing `id`, removing both directed links.
    /// Returns the former partner, or None if `id` had no session.
    pub fn unlink(&mut self, id: &ChatId) -> Option<ChatId> {
        let partner = self.links.remove(id)?;
        self.links.remove(&partner);
        Some(partner)
    }

    /// Current partner of `id`, if any
    pub fn partner(&self, id: &ChatId) -> Option<ChatId> {
        self.links.get(id).copied()
    }

    /// Whether `id` is currently in a session
    pub fn contains(&self, id: &ChatId) -> bool {
        self.links.contains_key(id)
    }

    /// Every active pair exactly once. The store holds two directed entries
    /// per session, so a seen-set dedupes.
    pub fn active_pairs(&self) -> Vec<(ChatId, ChatId)> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for (&a, &b) in &self.links {
            if seen.contains(&a) {
                continue;
            }
            seen.insert(a);
            seen.insert(b);
            pairs.push((a, b));
        }
        pairs
    }

    /// Number of active sessions
    pub fn session_count(&self) -> usize {
        self.links.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
