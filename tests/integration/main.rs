//! Workspace integration tests.

mod helpers;
mod pagination_test;
mod postgres_test;
mod repository_test;
