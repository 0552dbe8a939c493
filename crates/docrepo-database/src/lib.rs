//! # docrepo-database
//!
//! Store backends and the generic repository built on top of them.
//!
//! - **memory**: in-process store using [dashmap](https://crates.io/crates/dashmap)
//! - **postgres**: JSONB store using [sqlx](https://crates.io/crates/sqlx)
//!
//! The backend is selected at runtime based on configuration.

mod identity;
#[cfg(feature = "memory")]
pub mod memory;
pub mod pagination;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod provider;
pub mod repository;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use pagination::paginate;
#[cfg(feature = "postgres")]
pub use postgres::{DatabasePool, PgDocumentStore};
pub use provider::StoreManager;
pub use repository::BaseRepository;
