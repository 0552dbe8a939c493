//! Core type definitions used across the docrepo workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod patch;
pub mod path;
pub mod projection;
pub mod query;
pub mod raw;
pub mod sorting;

pub use filter::{Filter, FilterField, FilterOp, FilterValue};
pub use id::{DocumentId, ID_FIELD};
pub use pagination::{DEFAULT_PAGE_SIZE, ListQuery, Page, Pagination};
pub use patch::Patch;
pub use projection::Projection;
pub use query::FindQuery;
pub use raw::RawDocument;
pub use sorting::{Sort, SortDirection, SortField};
