use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use super::{DocumentStore, StoreError};
use crate::models::{Document, DocumentChanges, DocumentId, NewDocument};

/// In-memory document store.
///
/// Uses BTreeMap so ties in creation time list in a stable id order.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: BTreeMap<DocumentId, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store around already-persisted documents
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: documents.into_iter().map(|doc| (doc.id, doc)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub(crate) fn sorted(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self.documents.values().cloned().collect();
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        docs
    }
}

impl DocumentStore for MemoryStore {
    fn create(&mut self, new: NewDocument) -> Result<Document, StoreError> {
        new.validate()?;

        let doc = new.into_document(Uuid::new_v4(), Utc::now());
        self.documents.insert(doc.id, doc.clone());
        Ok(doc)
    }

    fn get(&self, id: DocumentId) -> Result<Document, StoreError> {
        self.documents
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.sorted())
    }

    fn update(
        &mut self,
        id: DocumentId,
        changes: DocumentChanges,
    ) -> Result<Document, StoreError> {
        let doc = self
            .documents
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        doc.apply_changes(changes, Utc::now());
        Ok(doc.clone())
    }

    fn delete(&mut self, id: DocumentId) -> Result<(), StoreError> {
        self.documents
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
