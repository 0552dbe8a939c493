//! Store-level query composition.

use serde::{Deserialize, Serialize};

use crate::types::filter::Filter;
use crate::types::projection::Projection;
use crate::types::sorting::Sort;

/// A composed find query: filter, projection, order and window.
///
/// Built incrementally the way a driver's query builder is:
/// `FindQuery::new(filter).sort(sort).skip(20).limit(10)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindQuery {
    /// Documents must satisfy every condition.
    pub filter: Filter,
    /// Fields to return; `None` returns whole documents.
    pub projection: Option<Projection>,
    /// Result order; empty means natural order.
    pub sort: Sort,
    /// Number of leading matches to drop.
    pub skip: Option<u64>,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
}

impl FindQuery {
    /// A query over `filter` in natural order.
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            projection: None,
            sort: Sort::natural(),
            skip: None,
            limit: None,
        }
    }

    /// Restrict returned fields.
    pub fn select(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the result order.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Skip leading matches.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
