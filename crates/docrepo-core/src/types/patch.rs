//! Partial updates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::id::ID_FIELD;

/// A set of top-level field assignments and removals.
///
/// The identity field can never be changed through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Fields to assign.
    #[serde(default)]
    pub set: Map<String, Value>,
    /// Fields to remove.
    #[serde(default)]
    pub unset: Vec<String>,
}

impl Patch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a patch from a partially populated value.
    ///
    /// The value must serialize to a JSON object; `null` fields are
    /// skipped, so a struct of `Option`s acts as a partial entity.
    pub fn from_partial<P: Serialize>(partial: &P) -> AppResult<Self> {
        match serde_json::to_value(partial)? {
            Value::Object(map) => Ok(Self {
                set: map
                    .into_iter()
                    .filter(|(key, value)| !value.is_null() && key != ID_FIELD)
                    .collect(),
                unset: Vec::new(),
            }),
            _ => Err(AppError::validation("partial update must be a JSON object")),
        }
    }

    /// Assign a field. Assigning `_id` is ignored.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        if field != ID_FIELD {
            self.set.insert(field, value.into());
        }
        self
    }

    /// Remove a field. Removing `_id` is ignored.
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if field != ID_FIELD && !self.unset.contains(&field) {
            self.unset.push(field);
        }
        self
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Assignments with any `_id` entry removed.
    pub fn assignments(&self) -> Map<String, Value> {
        self.set
            .iter()
            .filter(|(key, _)| key.as_str() != ID_FIELD)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Removals with any `_id` entry removed.
    pub fn removals(&self) -> Vec<String> {
        self.unset
            .iter()
            .filter(|field| field.as_str() != ID_FIELD)
            .cloned()
            .collect()
    }

    /// Apply the patch to a stored document in place.
    pub fn apply_to(&self, doc: &mut Map<String, Value>) {
        for field in self.removals() {
            doc.remove(&field);
        }
        for (field, value) in self.assignments() {
            doc.insert(field, value);
        }
    }
}
