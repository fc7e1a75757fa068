pub mod editing;
pub mod models;
pub mod render;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    EditBuffer, HeadingLevel, InvariantViolation, Transformation, Transformed, transform,
    transform_action,
};
pub use models::*;
pub use render::render_html;
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};
