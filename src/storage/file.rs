//! JSON file backend.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{StorageBackend, codec};
use crate::model::Database;
use crate::{Error, Result};

/// Map stored as one JSON file.
///
/// Saves go to a sibling `.tmp` file that is then renamed over the target,
/// so readers see either the old map or the new one.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for FileBackend {
    fn exists(&self) -> Result<bool> {
        Ok(self.path.try_exists()?)
    }

    fn load(&self) -> Result<Database> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(format!(
                    "database file {} (run begin first)",
                    self.path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };
        codec::decode(&bytes)
    }

    fn save(&self, db: &Database) -> Result<()> {
        let bytes = codec::encode(db)?;
        let tmp = self.temp_path();
        if let Err(e) = write_and_rename(&tmp, &self.path, &bytes) {
            // Best effort: the temp file may never have been created.
            let _ = fs::remove_file(&tmp);
            tracing::warn!(path = %self.path.display(), error = %e, "save failed");
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "saved database");
        Ok(())
    }
}

fn write_and_rename(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nodes"));
        assert!(!backend.exists().unwrap());

        let now = NaiveDateTime::parse_from_str("2024-05-01T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        backend.save(&Database::begin(now)).unwrap();
        assert!(backend.exists().unwrap());
        assert!(!dir.path().join("nodes.tmp").exists());
        assert_eq!(backend.load().unwrap(), Database::begin(now));
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the map should go makes the rename fail.
        let path = dir.path().join("nodes");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"").unwrap();

        let now = NaiveDateTime::parse_from_str("2024-05-01T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let backend = FileBackend::new(&path);
        assert!(matches!(backend.save(&Database::begin(now)), Err(Error::Io(_))));
        assert!(!dir.path().join("nodes.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("absent"));
        assert!(matches!(backend.load(), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes");
        fs::write(&path, b"{\"nodes\": []").unwrap();
        assert!(matches!(FileBackend::new(path).load(), Err(Error::Load(_))));
    }
}
