//! PostgreSQL backend storing documents as JSONB.

pub mod connection;
pub mod migration;
pub mod sql;
pub mod store;

pub use connection::DatabasePool;
pub use migration::run_migrations;
pub use store::PgDocumentStore;
