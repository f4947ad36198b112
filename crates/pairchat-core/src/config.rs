//! Centralized Configuration Management
//!
//! This module consolidates the configuration structures used throughout the
//! engine to provide a unified, consistent configuration interface.

use core::time::Duration;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Configuration for CSP channel buffer sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Buffer size for Command channels (Transport → Engine)
    pub command_buffer_size: usize,
    /// Buffer size for Event channels (Timer tasks → Engine)
    pub event_buffer_size: usize,
    /// Buffer size for Effect channels (Engine → Notifier)
    pub effect_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 64,  // inbound platform updates can be bursty
            event_buffer_size: 64,    // one timer event per waiting participant
            effect_buffer_size: 128,  // every command can fan out several notices
        }
    }
}

impl ChannelConfig {
    /// Create configuration optimized for testing
    pub fn testing() -> Self {
        Self {
            command_buffer_size: 100,
            event_buffer_size: 100,
            effect_buffer_size: 256,
        }
    }
}

// ----------------------------------------------------------------------------
// Matching Configuration
// ----------------------------------------------------------------------------

/// Configuration for queueing and match search behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// How long a participant waits in a queue before the search is
    /// abandoned automatically, in milliseconds
    pub search_timeout_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            search_timeout_ms: 60_000,
        }
    }
}

impl MatchConfig {
    /// The search timeout as a [`Duration`]
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

// ----------------------------------------------------------------------------
// Moderation Configuration
// ----------------------------------------------------------------------------

/// Configuration for content moderation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Static substring blocklist, matched case-insensitively against
    /// inbound text
    pub blocklist: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            blocklist: vec![
                "badword1".to_string(),
                "badword2".to_string(),
                "badword3".to_string(),
            ],
        }
    }
}

// ----------------------------------------------------------------------------
// Combined Engine Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the Pairchat engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairchatConfig {
    pub channels: ChannelConfig,
    pub matching: MatchConfig,
    pub moderation: ModerationConfig,
}

impl PairchatConfig {
    /// Create a configuration for tests: large buffers, and a timeout long
    /// enough that only tests which explicitly shorten it see a timer fire
    pub fn testing() -> Self {
        Self {
            channels: ChannelConfig::testing(),
            matching: MatchConfig {
                search_timeout_ms: 5_000,
            },
            moderation: ModerationConfig::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> crate::Result<()> {
        if self.matching.search_timeout_ms == 0 {
            return Err(crate::PairchatError::config_error(
                "search timeout must be greater than 0",
            ));
        }
        if self.channels.command_buffer_size == 0
            || self.channels.event_buffer_size == 0
            || self.channels.effect_buffer_size == 0
        {
            return Err(crate::PairchatError::config_error(
                "channel buffer sizes must be greater than 0",
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
