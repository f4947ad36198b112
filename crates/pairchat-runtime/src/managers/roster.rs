//! Identity registry for the Pairchat engine
//!
//! Tracks the minimal profile info the platform supplies per participant.
//! Entries are created or refreshed on registration and never deleted.

use std::collections::HashMap;

use pairchat_core::{ChatId, Profile};

/// Registry of everyone who has ever registered with the engine
#[derive(Debug, Default)]
pub struct Roster {
    profiles: HashMap<ChatId, Profile>,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Create or refresh a participant's profile
    pub fn upsert(&mut self, id: ChatId, profile: Profile) {
        self.profiles.insert(id, profile);
    }

    /// Look up a participant's profile
    pub fn get(&self, id: &ChatId) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// Username for admin reports, if the participant shared one
    pub fn username_of(&self, id: &ChatId) -> Option<&str> {
        self.profiles.get(id).and_then(|p| p.username.as_deref())
    }

    /// Number of known participants
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
