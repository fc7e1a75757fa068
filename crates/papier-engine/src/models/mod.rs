pub mod document;

pub use document::{Document, DocumentChanges, DocumentId, NewDocument, ValidationError};
