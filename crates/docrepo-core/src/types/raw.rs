//! Untyped documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::document::Document;
use crate::types::id::ID_FIELD;

/// A schemaless document, for tools that work on arbitrary collections.
///
/// Its default collection is `documents`; pair it with
/// `BaseRepository::with_collection` to address any other collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument(pub Map<String, Value>);

impl RawDocument {
    /// Borrow the fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Return the document as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl Document for RawDocument {
    const COLLECTION: &'static str = "documents";

    fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for RawDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
