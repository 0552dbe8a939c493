//! Identity assignment shared by the store backends.

use serde_json::{Map, Value};

use docrepo_core::error::AppError;
use docrepo_core::result::AppResult;
use docrepo_core::types::{DocumentId, ID_FIELD};

/// Ensure a document is an object with a string `_id`, generating one
/// when it is absent or null. Returns the identity and the object.
pub(crate) fn assign_identity(doc: Value) -> AppResult<(String, Map<String, Value>)> {
    let Value::Object(mut map) = doc else {
        return Err(AppError::validation("document must be a JSON object"));
    };
    let id = match map.get(ID_FIELD) {
        None | Some(Value::Null) => {
            let id = DocumentId::generate().into_inner();
            map.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
        Some(Value::String(id)) => id.clone(),
        Some(other) => {
            return Err(AppError::validation(format!(
                "document {ID_FIELD} must be a string, got {other}"
            )));
        }
    };
    Ok((id, map))
}

/// The identity of a stored document.
pub(crate) fn document_id(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}
