//! In-memory storage backend.
//!
//! Keeps the encoded bytes rather than a `Database` value, so a test can
//! compare the stored form before and after a command byte for byte.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{StorageBackend, codec};
use crate::model::Database;
use crate::{Error, Result};

/// In-memory map storage. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<Option<Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend pre-loaded with `db`.
    pub fn with_database(db: &Database) -> Result<Self> {
        let backend = Self::new();
        backend.save(db)?;
        Ok(backend)
    }

    /// Current stored bytes, if any.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.inner.read().clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn exists(&self) -> Result<bool> {
        Ok(self.inner.read().is_some())
    }

    fn load(&self) -> Result<Database> {
        let slot = self.inner.read();
        let bytes = slot
            .as_deref()
            .ok_or_else(|| Error::NotFound("in-memory database (run begin first)".into()))?;
        codec::decode(bytes)
    }

    fn save(&self, db: &Database) -> Result<()> {
        let bytes = codec::encode(db)?;
        *self.inner.write() = Some(bytes);
        Ok(())
    }
}
