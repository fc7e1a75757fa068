use tempfile::TempDir;

use crate::models::NewDocument;

/// Create a temporary directory to hold a document store file
pub fn create_test_data_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// A valid create request owned by the test user
pub fn sample_document(title: &str) -> NewDocument {
    NewDocument::new(title, "user123")
}
