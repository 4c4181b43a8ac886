//! Blob storage — store bytes under a name, list names, delete by name.
//!
//! A capability, not a data model: the contents are never inspected. Backs
//! image uploads and video files.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::ServiceError;
use crate::store::StoreError;

/// Directory-backed blob store.
#[derive(Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    /// Open a blob store over the given directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self { dir })
    }

    /// Store bytes under a name, overwriting any existing blob.
    pub fn put(&self, name: &str, bytes: &[u8]) -> Result<(), ServiceError> {
        validate_name(name)?;
        fs::write(self.dir.join(name), bytes)
            .map_err(|e| ServiceError::Store(StoreError::Io(e.to_string())))
    }

    /// Read a blob. Returns `None` if no blob has that name.
    pub fn get(&self, name: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        validate_name(name)?;
        match fs::read(self.dir.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::Store(StoreError::Io(e.to_string()))),
        }
    }

    /// List all blob names, sorted.
    pub fn list(&self) -> Result<Vec<String>, ServiceError> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| ServiceError::Store(StoreError::Io(e.to_string())))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ServiceError::Store(StoreError::Io(e.to_string())))?;
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a blob by name. Returns whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool, ServiceError> {
        validate_name(name)?;
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::Store(StoreError::Io(e.to_string()))),
        }
    }
}

/// Blob names must be bare file names: no separators, no traversal.
fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\')
    {
        return Err(ServiceError::Validation(format!(
            "invalid blob name `{}`",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, BlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::open(dir.path().join("blobs")).unwrap();
        (dir, blobs)
    }

    #[test]
    fn put_then_get() {
        let (_dir, blobs) = store();
        blobs.put("a.png", b"bytes").unwrap();
        assert_eq!(blobs.get("a.png").unwrap().unwrap(), b"bytes");
    }

    #[test]
    fn get_missing_returns_none() {
        let (_dir, blobs) = store();
        assert!(blobs.get("nope.png").unwrap().is_none());
    }

    #[test]
    fn list_is_sorted() {
        let (_dir, blobs) = store();
        blobs.put("b.png", b"2").unwrap();
        blobs.put("a.png", b"1").unwrap();
        assert_eq!(blobs.list().unwrap(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn delete_reports_existence() {
        let (_dir, blobs) = store();
        blobs.put("a.png", b"1").unwrap();
        assert!(blobs.delete("a.png").unwrap());
        assert!(!blobs.delete("a.png").unwrap());
    }

    #[test]
    fn traversal_names_are_rejected() {
        let (_dir, blobs) = store();
        for name in ["", ".", "..", "../x", "a/b", "a\\b"] {
            let err = blobs.get(name).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{}", name);
        }
    }
}
