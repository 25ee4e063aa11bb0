//! # Storage Backend Trait
//!
//! The contract between the exploration engines and wherever the map is
//! kept. A backend stores one encoded database and hands it back whole;
//! there is no partial read or write.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `FileBackend` | `file` | JSON file on disk, replaced atomically |
//! | `MemoryBackend` | `memory` | In-memory bytes for testing/embedding |

pub mod codec;
pub mod file;
pub mod memory;

use std::path::PathBuf;

use crate::model::Database;
use crate::Result;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Default database file name, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "nodes";

// ============================================================================
// Backend Configuration
// ============================================================================

/// Where the map lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// In-memory (no persistence)
    Memory,

    /// JSON file
    File { path: PathBuf },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::File { path: PathBuf::from(DEFAULT_DB_PATH) }
    }
}

/// Build the backend a config describes.
pub fn connect(config: &BackendConfig) -> Box<dyn StorageBackend> {
    match config {
        BackendConfig::Memory => Box::new(MemoryBackend::new()),
        BackendConfig::File { path } => Box::new(FileBackend::new(path.clone())),
    }
}

// ============================================================================
// StorageBackend Trait
// ============================================================================

/// Whole-database persistence.
pub trait StorageBackend {
    /// Whether a database has been stored yet.
    fn exists(&self) -> Result<bool>;

    /// Read and validate the stored database.
    fn load(&self) -> Result<Database>;

    /// Replace the stored database.
    fn save(&self, db: &Database) -> Result<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn exists(&self) -> Result<bool> {
        (**self).exists()
    }

    fn load(&self) -> Result<Database> {
        (**self).load()
    }

    fn save(&self, db: &Database) -> Result<()> {
        (**self).save(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_file() {
        assert_eq!(
            BackendConfig::default(),
            BackendConfig::File { path: PathBuf::from("nodes") }
        );
    }

    #[test]
    fn test_connect_memory() {
        let backend = connect(&BackendConfig::Memory);
        assert!(!backend.exists().unwrap());
    }
}
