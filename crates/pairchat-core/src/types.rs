//! Core types for the Pairchat engine
//!
//! This module defines the fundamental types used throughout the engine,
//! using newtype patterns for semantic validation and type safety.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Chat Identifier
// ----------------------------------------------------------------------------

/// Unique identifier for a participant, assigned by the messaging platform.
///
/// The platform's numeric chat id is the only stable key the engine has for
/// a participant; everything else (display name, username) is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChatId(i64);

impl ChatId {
    /// Create a new ChatId from the platform's numeric id
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw numeric id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatId {
    type Err = crate::PairchatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| crate::PairchatError::invalid_input(format!("invalid chat id: {s:?}")))
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// ----------------------------------------------------------------------------
// Pairing Category
// ----------------------------------------------------------------------------

/// The two-sided grouping used to match opposite pools.
///
/// A joiner in one category is matched against the oldest waiter in the
/// opposite category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Male,
    Female,
}

impl Category {
    /// The category this one is matched against
    pub fn opposite(&self) -> Self {
        match self {
            Category::Male => Category::Female,
            Category::Female => Category::Male,
        }
    }

    /// Both categories, in a fixed reporting order
    pub const ALL: [Category; 2] = [Category::Male, Category::Female];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Male => write!(f, "male"),
            Category::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Category {
    type Err = crate::PairchatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Category::Male),
            "female" | "f" => Ok(Category::Female),
            other => Err(crate::PairchatError::invalid_input(format!(
                "unknown category: {other:?}"
            ))),
        }
    }
}

// ----------------------------------------------------------------------------
// Participant Profile
// ----------------------------------------------------------------------------

/// Minimal profile info captured when a participant first interacts.
///
/// Both fields come straight from the platform and may be absent; the engine
/// never requires them, it only surfaces them in greetings and admin reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name as reported by the platform
    pub first_name: Option<String>,
    /// Platform username (without the `@`)
    pub username: Option<String>,
}

impl Profile {
    pub fn new(first_name: Option<String>, username: Option<String>) -> Self {
        Self {
            first_name,
            username,
        }
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Millisecond timestamp since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a new timestamp
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Get current timestamp
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as u64)
    }

    /// Get the raw milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Get duration since another timestamp
    pub fn duration_since(&self, other: Self) -> core::time::Duration {
        core::time::Duration::from_millis(self.0.saturating_sub(other.0))
    }
}

// ----------------------------------------------------------------------------
// Time Source Trait
// ----------------------------------------------------------------------------

/// Trait for providing timestamps.
///
/// Lets tests substitute a deterministic clock for the engine's bookkeeping
/// (ban timestamps, uptime) without touching the system clock.
pub trait TimeSource {
    /// Get the current timestamp
    fn now(&self) -> Timestamp;
}

/// Standard library implementation of TimeSource
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_id_roundtrip() {
        let id = ChatId::new(1625397184);
        assert_eq!(id.value(), 1625397184);
        assert_eq!(id.to_string(), "1625397184");
        assert_eq!("1625397184".parse::<ChatId>().unwrap(), id);
        assert_eq!(" -42 ".parse::<ChatId>().unwrap(), ChatId::new(-42));
        assert!("abc".parse::<ChatId>().is_err());
    }

    #[test]
    fn test_category_opposite() {
        assert_eq!(Category::Male.opposite(), Category::Female);
        assert_eq!(Category::Female.opposite(), Category::Male);
        assert_eq!(Category::Male.opposite().opposite(), Category::Male);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("male".parse::<Category>().unwrap(), Category::Male);
        assert_eq!("F".parse::<Category>().unwrap(), Category::Female);
        assert_eq!(" Female ".parse::<Category>().unwrap(), Category::Female);
        assert!("other".parse::<Category>().is_err());
    }

    #[test]
    fn test_timestamp_duration_since() {
        let earlier = Timestamp::new(1_000);
        let later = Timestamp::new(4_500);
        assert_eq!(later.duration_since(earlier).as_millis(), 3_500);
        // Saturates rather than underflows
        assert_eq!(earlier.duration_since(later).as_millis(), 0);
    }
}
