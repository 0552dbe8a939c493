//! Core traits defined in `docrepo-core` and implemented by other crates.

pub mod document;
pub mod repository;
pub mod store;

pub use document::Document;
pub use repository::Repository;
pub use store::DocumentStore;
