//! Filter types for dynamic query building.
//!
//! A [`Filter`] is a conjunction of [`FilterField`] conditions. Store
//! backends receive it unchanged and decide how to evaluate it; the
//! repository never inspects its contents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::id::ID_FIELD;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal. Also matches documents missing the field.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// SQL `LIKE` pattern match (`%` and `_` wildcards).
    Like,
    /// Case-insensitive `LIKE`.
    ILike,
    /// List membership.
    In,
    /// Field is missing or `null`.
    IsNull,
    /// Field is present and not `null`.
    IsNotNull,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for `In`).
    StringList(Vec<String>),
    /// A list of mixed values (for `In`).
    List(Vec<FilterValue>),
    /// Null / no value (for `IsNull`, `IsNotNull`).
    Null,
}

impl FilterValue {
    /// Convert to the JSON value stored documents are compared against.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Boolean(b) => Value::Bool(*b),
            Self::StringList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Null => Value::Null,
        }
    }

    /// Convert a scalar or array JSON value into a filter value.
    pub fn from_json(value: &Value) -> AppResult<Self> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => {
                if items.iter().all(Value::is_string) {
                    Self::StringList(
                        items
                            .iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect(),
                    )
                } else {
                    Self::List(items.iter().map(Self::from_json).collect::<AppResult<_>>()?)
                }
            }
            Value::Object(_) => {
                return Err(AppError::validation(
                    "object values are not supported in filters",
                ));
            }
        })
    }

    /// Return the elements of a list value, or `None` for scalars.
    pub fn as_list(&self) -> Option<Vec<Value>> {
        match self {
            Self::StringList(_) | Self::List(_) => match self.to_json() {
                Value::Array(items) => Some(items),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The field name or dotted path to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    /// Shorthand for an inequality filter.
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Ne, value.into())
    }

    /// Shorthand for a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Gt, value.into())
    }

    /// Shorthand for a greater-than-or-equal filter.
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Gte, value.into())
    }

    /// Shorthand for a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Lt, value.into())
    }

    /// Shorthand for a less-than-or-equal filter.
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Lte, value.into())
    }

    /// Shorthand for a LIKE filter.
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Like, FilterValue::String(pattern.into()))
    }

    /// Shorthand for a case-insensitive LIKE filter.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::ILike, FilterValue::String(pattern.into()))
    }

    /// Shorthand for a list membership filter.
    pub fn is_in(field: impl Into<String>, values: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::In, values.into())
    }

    /// Shorthand for a missing-or-null filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }

    /// Shorthand for a present-and-not-null filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNotNull, FilterValue::Null)
    }

    /// The operator backends should evaluate.
    ///
    /// Equality against `null` means "missing or null", as in a document
    /// store; inequality against `null` means "present and not null".
    pub fn effective_op(&self) -> FilterOp {
        match (self.op, &self.value) {
            (FilterOp::Eq, FilterValue::Null) => FilterOp::IsNull,
            (FilterOp::Ne, FilterValue::Null) => FilterOp::IsNotNull,
            (op, _) => op,
        }
    }
}

/// A conjunction of filter conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    conditions: Vec<FilterField>,
}

impl Filter {
    /// The empty filter, matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from a list of conditions.
    pub fn new(conditions: Vec<FilterField>) -> Self {
        Self { conditions }
    }

    /// Match a single document by identity.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::all().and(FilterField::eq(ID_FIELD, id.into()))
    }

    /// Add a condition.
    pub fn and(mut self, condition: FilterField) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The conditions, all of which must hold.
    pub fn conditions(&self) -> &[FilterField] {
        &self.conditions
    }

    /// Whether this filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Parse a document-store style predicate object.
    ///
    /// `{"status": "open", "age": {"$gte": 18}, "tags": {"$in": ["a", "b"]}}`
    /// becomes three conditions. `null` and `{}` match everything.
    ///
    /// Supported operators are `$eq $ne $gt $gte $lt $lte $in $like
    /// $ilike $exists`; anything else (`$regex`, `$or`, ...) is a
    /// `Validation` error. Unlike MongoDB:
    /// - an exact sub-document match such as `{"address": {"city": "Oslo"}}`
    ///   is rejected; use a dotted path (`{"address.city": "Oslo"}`);
    /// - equality against an array field compares the whole array, so
    ///   `{"tags": "a"}` does not match `{"tags": ["a", "b"]}`.
    pub fn from_json(predicate: &Value) -> AppResult<Self> {
        let map = match predicate {
            Value::Null => return Ok(Self::all()),
            Value::Object(map) => map,
            _ => return Err(AppError::validation("filter must be a JSON object")),
        };

        let mut filter = Self::all();
        for (field, value) in map {
            if field.starts_with('$') {
                return Err(AppError::validation(format!(
                    "unsupported top-level operator '{field}'"
                )));
            }
            match value {
                Value::Object(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
                    for (op, operand) in ops {
                        filter = filter.and(parse_operator(field, op, operand)?);
                    }
                }
                _ => {
                    filter = filter.and(FilterField::new(
                        field.clone(),
                        FilterOp::Eq,
                        FilterValue::from_json(value)?,
                    ));
                }
            }
        }
        Ok(filter)
    }
}

impl From<FilterField> for Filter {
    fn from(condition: FilterField) -> Self {
        Self::new(vec![condition])
    }
}

fn parse_operator(field: &str, op: &str, operand: &Value) -> AppResult<FilterField> {
    let op = match op {
        "$eq" => FilterOp::Eq,
        "$ne" => FilterOp::Ne,
        "$gt" => FilterOp::Gt,
        "$gte" => FilterOp::Gte,
        "$lt" => FilterOp::Lt,
        "$lte" => FilterOp::Lte,
        "$like" => FilterOp::Like,
        "$ilike" => FilterOp::ILike,
        "$in" => {
            if !operand.is_array() {
                return Err(AppError::validation(format!(
                    "$in on '{field}' requires an array"
                )));
            }
            FilterOp::In
        }
        "$exists" => {
            let exists = operand.as_bool().ok_or_else(|| {
                AppError::validation(format!("$exists on '{field}' requires a boolean"))
            })?;
            return Ok(if exists {
                FilterField::is_not_null(field)
            } else {
                FilterField::is_null(field)
            });
        }
        other => {
            return Err(AppError::validation(format!(
                "unsupported operator '{other}' on '{field}'"
            )));
        }
    };

    if matches!(op, FilterOp::Like | FilterOp::ILike) && !operand.is_string() {
        return Err(AppError::validation(format!(
            "pattern on '{field}' must be a string"
        )));
    }

    Ok(FilterField::new(field, op, FilterValue::from_json(operand)?))
}
