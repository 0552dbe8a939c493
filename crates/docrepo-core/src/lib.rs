//! # docrepo-core
//!
//! Core crate for docrepo. Contains the document and store traits,
//! configuration schemas, query value types (filter, sort, projection,
//! patch, pagination), and the unified error system.
//!
//! This crate has **no** internal dependencies on other docrepo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
