//! Storage abstraction for durable deployments
//!
//! The engine owns all state in memory; deployments that want ban records to
//! survive restarts plug in a [`DurableStore`]. Wait queues and session links
//! are deliberately not persisted: they are conversational state with no
//! meaning across a restart, and resurrecting them would also resurrect
//! dangling search timers.
//!
//! Byte-oriented keys and values keep the trait implementable over any
//! key-value backend. A backend without ordered collection operations cannot
//! express FIFO pops; the in-memory queues remain the ordering source of
//! truth for that reason.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::{Result, StorageError};

// ----------------------------------------------------------------------------
// Storage Trait
// ----------------------------------------------------------------------------

/// Key-value storage abstraction for durable engine state
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Store data under a key, overwriting any previous value
    async fn store(&mut self, key: &str, data: Vec<u8>) -> Result<()>;

    /// Retrieve data by key
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Delete data by key; absent keys are a no-op
    async fn delete(&mut self, key: &str) -> Result<()>;

    /// List all keys with the given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;
}

// ----------------------------------------------------------------------------
// Memory Storage Implementation
// ----------------------------------------------------------------------------

/// In-memory storage implementation for testing and single-process
/// deployments
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, Vec<u8>>,
    available: bool,
}

impl MemoryStore {
    /// Create a new memory store
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            available: true,
        }
    }

    /// Create a store that fails every operation, for exercising the
    /// fail-closed paths in tests
    pub fn unavailable() -> Self {
        Self {
            data: BTreeMap::new(),
            available: false,
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable {
                reason: "memory store marked unavailable".to_string(),
            }
            .into())
        }
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn store(&mut self, key: &str, data: Vec<u8>) -> Result<()> {
        self.check_available()?;
        self.data.insert(key.to_string(), data);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_available()?;
        Ok(self.data.get(key).cloned())
    }

    async fn delete(&mut self, key: &str) -> Result<()> {
        self.check_available()?;
        self.data.remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.check_available()?;
        Ok(self
            .data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
