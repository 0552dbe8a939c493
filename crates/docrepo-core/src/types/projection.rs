//! Field projection (`select`) for queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::id::ID_FIELD;
use crate::types::path;

/// An inclusion list of fields to return. The identity field is always kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Build a projection from field names or dotted paths.
    ///
    /// Returns `None` when no non-empty field is given, which means
    /// "all fields".
    pub fn new<I, S>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for field in fields {
            let field: String = field.into();
            let field = field.trim();
            if !field.is_empty() && !out.iter().any(|f| f == field) {
                out.push(field.to_string());
            }
        }
        (!out.is_empty()).then_some(Self { fields: out })
    }

    /// Parse a comma-separated field list such as `"name,email"`.
    pub fn parse(list: &str) -> Option<Self> {
        Self::new(list.split(','))
    }

    /// The selected fields, in the order given.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Keep only the selected fields of a document.
    ///
    /// Non-object values are returned unchanged.
    pub fn apply(&self, doc: &Value) -> Value {
        let Value::Object(source) = doc else {
            return doc.clone();
        };

        let mut out = Map::new();
        if let Some(id) = source.get(ID_FIELD) {
            out.insert(ID_FIELD.to_string(), id.clone());
        }
        for field in &self.fields {
            if let Some(value) = path::lookup(doc, field) {
                path::insert(&mut out, field, value.clone());
            }
        }
        Value::Object(out)
    }
}
