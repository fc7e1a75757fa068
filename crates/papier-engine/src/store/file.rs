use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{DocumentStore, MemoryStore, StoreError};
use crate::models::{Document, DocumentChanges, DocumentId, NewDocument};

/// Document store persisted as a JSON array in a single file.
///
/// The whole collection is loaded on open and rewritten after each successful
/// mutation. A missing file is an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let inner = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let documents: Vec<Document> = if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            };
            log::debug!(
                "Loaded {} documents from {}",
                documents.len(),
                path.display()
            );
            MemoryStore::from_documents(documents)
        } else {
            log::debug!("No document store at {}, starting empty", path.display());
            MemoryStore::new()
        };

        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the collection to a temp file beside the store and rename it
    /// into place. The store file is replaced whole, never truncated.
    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // Create parent directories if they don't exist
        fs::create_dir_all(parent).map_err(io_err)?;

        let content =
            serde_json::to_string_pretty(&self.inner.sorted()).map_err(|source| {
                StoreError::Corrupt {
                    path: self.path.clone(),
                    source,
                }
            })?;

        let mut temp = NamedTempFile::new_in(parent).map_err(io_err)?;
        temp.write_all(content.as_bytes()).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn create(&mut self, new: NewDocument) -> Result<Document, StoreError> {
        let previous = self.inner.clone();
        let doc = self.inner.create(new)?;
        if let Err(e) = self.persist() {
            // Keep memory and disk in agreement
            self.inner = previous;
            return Err(e);
        }
        log::info!("Created document {} ({:?})", doc.id, doc.title);
        Ok(doc)
    }

    fn get(&self, id: DocumentId) -> Result<Document, StoreError> {
        self.inner.get(id)
    }

    fn list(&self) -> Result<Vec<Document>, StoreError> {
        self.inner.list()
    }

    fn update(
        &mut self,
        id: DocumentId,
        changes: DocumentChanges,
    ) -> Result<Document, StoreError> {
        let previous = self.inner.clone();
        let doc = self.inner.update(id, changes)?;
        if let Err(e) = self.persist() {
            self.inner = previous;
            return Err(e);
        }
        log::info!("Updated document {id}");
        Ok(doc)
    }

    fn delete(&mut self, id: DocumentId) -> Result<(), StoreError> {
        let previous = self.inner.clone();
        self.inner.delete(id)?;
        if let Err(e) = self.persist() {
            self.inner = previous;
            return Err(e);
        }
        log::info!("Deleted document {id}");
        Ok(())
    }
}
