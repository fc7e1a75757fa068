//! Document persistence.
//!
//! [`DocumentStore`] is the create/read/update/delete contract the editor
//! talks to. [`MemoryStore`] keeps documents in process; [`FileStore`] layers
//! JSON persistence on top of it.

mod file;
mod memory;

use std::path::PathBuf;

use crate::models::{Document, DocumentChanges, DocumentId, NewDocument, ValidationError};

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),
    #[error("Invalid document: {0}")]
    Invalid(#[from] ValidationError),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Corrupt document store at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub trait DocumentStore {
    /// Validate and store a new document with a fresh id
    fn create(&mut self, new: NewDocument) -> Result<Document, StoreError>;

    fn get(&self, id: DocumentId) -> Result<Document, StoreError>;

    /// All documents, oldest first
    fn list(&self) -> Result<Vec<Document>, StoreError>;

    fn update(&mut self, id: DocumentId, changes: DocumentChanges)
    -> Result<Document, StoreError>;

    fn delete(&mut self, id: DocumentId) -> Result<(), StoreError>;
}
