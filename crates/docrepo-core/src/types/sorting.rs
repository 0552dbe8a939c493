//! Sorting types for list queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::ID_FIELD;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "asc" | "ascending" => Ok(Self::Asc),
            "-1" | "desc" | "descending" => Ok(Self::Desc),
            other => Err(AppError::validation(format!(
                "invalid sort direction '{other}'"
            ))),
        }
    }
}

/// A sort key: a field name and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field name or dotted path to sort by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Create an ascending sort on the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Create a descending sort on the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

impl FromStr for SortField {
    type Err = AppError;

    /// Parse `field`, `field:1`, `field:-1`, `field:asc` or `field:desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.rsplit_once(':') {
            Some((field, dir)) => (field.trim(), dir.parse()?),
            None => (s.trim(), SortDirection::Asc),
        };
        if field.is_empty() {
            return Err(AppError::validation(format!("empty sort field in '{s}'")));
        }
        Ok(Self::new(field, direction))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        write!(f, "{}:{dir}", self.field)
    }
}

/// An ordered list of sort keys. The empty sort means natural order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort(Vec<SortField>);

impl Sort {
    /// Natural (insertion) order.
    pub fn natural() -> Self {
        Self(Vec::new())
    }

    /// Sort by a single key.
    pub fn by(field: SortField) -> Self {
        Self(vec![field])
    }

    /// Append a tie-breaking key.
    pub fn then(mut self, field: SortField) -> Self {
        self.0.push(field);
        self
    }

    /// The sort keys in priority order.
    pub fn fields(&self) -> &[SortField] {
        &self.0
    }

    /// Whether this is natural order.
    pub fn is_natural(&self) -> bool {
        self.0.is_empty()
    }
}

/// Newest first: identity descending.
impl Default for Sort {
    fn default() -> Self {
        Self::by(SortField::desc(ID_FIELD))
    }
}

impl FromStr for Sort {
    type Err = AppError;

    /// Parse a comma-separated list such as `"name:1,_id:-1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<SortField>, _>>()?;
        Ok(Self(fields))
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}
