//! Pagination types for list queries.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::filter::Filter;
use crate::types::projection::Projection;
use crate::types::sorting::Sort;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Page metadata for a listing.
///
/// `total` counts every document matching the filter, independent of the
/// window returned; `total_pages` is `ceil(total / page_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of matching items.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

/// Parameters for a paginated listing.
///
/// `page == 0` disables windowing: every matching document is returned
/// and no pagination metadata is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Page number (1-based), or 0 for "everything".
    pub page: u64,
    /// Items per page. `None` uses the repository default.
    pub page_size: Option<u64>,
    /// Filter applied to both the count and the listing.
    pub search: Filter,
    /// Result order.
    pub sort: Sort,
    /// Fields to return. `None` returns every field.
    pub select: Option<Projection>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: None,
            search: Filter::all(),
            sort: Sort::default(),
            select: None,
        }
    }
}

impl ListQuery {
    /// A query for the given page with default size, filter and sort.
    pub fn page(page: u64) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// A query returning every matching document without windowing.
    pub fn unpaginated() -> Self {
        Self::page(0)
    }

    /// Set the page size.
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the filter.
    pub fn search(mut self, search: Filter) -> Self {
        self.search = search;
        self
    }

    /// Set the sort order.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Restrict returned fields.
    pub fn select(mut self, select: Projection) -> Self {
        self.select = Some(select);
        self
    }

    /// Restrict returned fields from a comma-separated list.
    pub fn select_fields(mut self, list: &str) -> Self {
        self.select = Projection::parse(list);
        self
    }
}

/// One page of records plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records in this window.
    pub records: Vec<T>,
    /// Page metadata; absent (serialized as `{}`) for unpaginated listings.
    #[serde(default, with = "pagination_or_empty")]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Transform the records, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

mod pagination_or_empty {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Pagination>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(pagination) => pagination.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Full(Pagination),
        Empty(serde_json::Map<String, serde_json::Value>),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Pagination>, D::Error> {
        Ok(match Option::<Repr>::deserialize(deserializer)? {
            Some(Repr::Full(pagination)) => Some(pagination),
            Some(Repr::Empty(_)) | None => None,
        })
    }
}
