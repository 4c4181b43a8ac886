//! FileStore — delimited-text-file-backed record store.

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::codec::{self, Record};

use super::{RecordStore, StoreError};

/// Record store backed by a single delimited text file.
///
/// `load_all` reads and decodes the whole file; a missing file loads as an
/// empty set. `save_all` encodes the whole set and rewrites the file. A
/// failure before the write leaves the file untouched; there is no partial
/// write recovery beyond that.
pub struct FileStore<R> {
    path: PathBuf,
    _marker: PhantomData<fn() -> R>,
}

impl<R> FileStore<R> {
    /// Create a store over the given file path. The file is not touched
    /// until the first `save_all`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

impl<R: Record> RecordStore<R> for FileStore<R> {
    fn load_all(&self) -> Result<Vec<R>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        Ok(codec::decode(&raw)?)
    }

    fn save_all(&self, records: &[R]) -> Result<(), StoreError> {
        fs::write(&self.path, codec::encode(records)).map_err(|e| StoreError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: i64,
        value: String,
    }

    impl Record for Row {
        const HEADER: &'static [&'static str] = &["ID", "Value"];

        fn to_row(&self) -> Vec<String> {
            vec![self.id.to_string(), self.value.clone()]
        }

        fn from_row(row: &[String]) -> Result<Self, String> {
            let id = row[0]
                .parse()
                .map_err(|_| format!("invalid ID `{}`", row[0]))?;
            Ok(Row {
                id,
                value: row[1].clone(),
            })
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Row> = FileStore::new(dir.path().join("rows.csv"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Row> = FileStore::new(dir.path().join("rows.csv"));
        let rows = vec![
            Row {
                id: 1,
                value: "a".into(),
            },
            Row {
                id: 2,
                value: "b".into(),
            },
        ];

        store.save_all(&rows).unwrap();
        assert_eq!(store.load_all().unwrap(), rows);
    }

    #[test]
    fn save_overwrites_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Row> = FileStore::new(dir.path().join("rows.csv"));

        store
            .save_all(&[Row {
                id: 1,
                value: "a".into(),
            }])
            .unwrap();
        store
            .save_all(&[Row {
                id: 2,
                value: "b".into(),
            }])
            .unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 2);
    }

    #[test]
    fn file_has_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let store: FileStore<Row> = FileStore::new(&path);

        store.save_all(&[]).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "ID,Value\n");
    }

    #[test]
    fn corrupt_file_surfaces_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "ID,Value\nnot-a-number,a\n").unwrap();

        let store: FileStore<Row> = FileStore::new(&path);
        let err = store.load_all().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Malformed(CodecError::Field { line: 2, .. })
        ));
    }
}
