//! In-process document store.

pub mod evaluator;
pub mod store;

pub use store::MemoryStore;
