//! Error types for the Pairchat engine
//!
//! Policy rejections (banned, blocked content, already queued) are not Rust
//! errors: they surface as [`Notice`](crate::channel::Notice) values delivered
//! back to the participant. The error types here cover the infrastructure
//! failures the engine itself can hit: channel wiring, configuration, and the
//! optional durable backing store.

// ----------------------------------------------------------------------------
// Storage Errors
// ----------------------------------------------------------------------------

/// Failures of the optional durable key-value backing
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Backing store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Failed to read key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Failed to write key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Corrupt record at key {key}: {reason}")]
    CorruptRecord { key: String, reason: String },
}

// ----------------------------------------------------------------------------
// Engine Error
// ----------------------------------------------------------------------------

/// Core error type for the Pairchat engine
#[derive(Debug, thiserror::Error)]
pub enum PairchatError {
    /// Channel communication error (internal to the CSP architecture)
    #[error("Channel error: {message}")]
    Channel { message: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Durable backing store error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Malformed external input (ids, categories)
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl PairchatError {
    /// Create a channel error with a message
    pub fn channel_error<T: Into<String>>(message: T) -> Self {
        PairchatError::Channel {
            message: message.into(),
        }
    }

    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        PairchatError::Configuration {
            reason: reason.into(),
        }
    }

    /// Create an invalid-input error with a reason
    pub fn invalid_input<T: Into<String>>(reason: T) -> Self {
        PairchatError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a storage-unavailable error
    pub fn storage_unavailable<T: Into<String>>(reason: T) -> Self {
        PairchatError::Storage(StorageError::Unavailable {
            reason: reason.into(),
        })
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, PairchatError>;
pub type PairchatResult<T> = Result<T>;

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
