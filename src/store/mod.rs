//! Record stores — whole-collection load/save over a persistence medium.
//!
//! A store exposes exactly two primitives: `load_all` and `save_all`. All
//! mutation is expressed as "load everything, compute the new full set in
//! memory, save everything" — there is no append-in-place or
//! delete-in-place. Backends:
//!
//! - [`FileStore`] — delimited text file, rewritten in full on every save.
//! - [`InMemoryStore`] — process-memory only, no persistence; the backend
//!   for resource types whose working set is deliberately discarded with
//!   the process.
//!
//! The choice of backend is a wiring decision: services take
//! `Box<dyn RecordStore<R>>` and never branch on it.
//!
//! ## Concurrency caveat
//!
//! Stores provide no mutual exclusion across concurrent load/save cycles.
//! Two concurrent mutations can both load the same snapshot and the second
//! `save_all` silently overwrites the first (lost update). This matches the
//! record counts and single-writer assumption the system is built for;
//! correctness under concurrent writers would need a single-writer lock or
//! serialized mutation queue around the load-compute-save sequence.

mod file;
mod in_memory;

use std::fmt;

use crate::codec::CodecError;

pub use file::FileStore;
pub use in_memory::InMemoryStore;

/// Whole-collection storage for records of one resource type.
pub trait RecordStore<R>: Send + Sync {
    /// Return every persisted record, in on-disk order. Pure read.
    ///
    /// A store that does not exist yet loads as empty, not as an error.
    fn load_all(&self) -> Result<Vec<R>, StoreError>;

    /// Fully overwrite the store with the given records, in the given
    /// order. The only write primitive.
    fn save_all(&self, records: &[R]) -> Result<(), StoreError>;
}

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Persisted content does not match the expected record shape.
    Malformed(CodecError),
    /// The underlying medium could not be read or written.
    Io(String),
    /// In-memory backend lock was poisoned.
    Lock(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Malformed(e) => write!(f, "malformed store: {}", e),
            StoreError::Io(msg) => write!(f, "store I/O error: {}", msg),
            StoreError::Lock(msg) => write!(f, "store lock error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for StoreError {
    fn from(err: CodecError) -> Self {
        StoreError::Malformed(err)
    }
}
