//! Single-document commands: get, find, create, update, delete.

use serde_json::Value;

use docrepo_core::error::AppError;
use docrepo_core::types::{Filter, Patch, RawDocument};

use super::RawRepository;
use crate::output::{self, OutputFormat};

/// Parse a JSON argument that must be an object.
fn parse_object(label: &str, source: &str) -> Result<serde_json::Map<String, Value>, AppError> {
    match serde_json::from_str(source)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::validation(format!(
            "{label} must be a JSON object, got {other}"
        ))),
    }
}

/// Build a patch from a JSON object. `null` fields are removed, all other
/// fields are assigned.
pub fn patch_from_json(source: &str) -> Result<Patch, AppError> {
    let patch = parse_object("changes", source)?
        .into_iter()
        .fold(Patch::new(), |patch, (field, value)| {
            if value.is_null() {
                patch.unset(field)
            } else {
                patch.set(field, value)
            }
        });
    if patch.is_empty() {
        return Err(AppError::validation("changes must name at least one field"));
    }
    Ok(patch)
}

/// Execute the get command
pub async fn get(repo: &RawRepository, id: &str, format: OutputFormat) -> Result<(), AppError> {
    match repo.get(id).await? {
        Some(doc) => output::print_document(&doc.into_value(), format),
        None => output::print_warning(&format!("Document '{}' not found", id)),
    }
    Ok(())
}

/// Execute the find command
pub async fn find(
    repo: &RawRepository,
    predicate: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let predicate: Value = serde_json::from_str(predicate)?;
    let docs: Vec<Value> = repo
        .find(&Filter::from_json(&predicate)?)
        .await?
        .into_iter()
        .map(RawDocument::into_value)
        .collect();
    output::print_documents(&docs, format);
    Ok(())
}

/// Execute the create command
pub async fn create(
    repo: &RawRepository,
    document: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let doc = RawDocument::from(parse_object("document", document)?);
    let stored = repo.create(&doc).await?;
    output::print_document(&stored.into_value(), format);
    Ok(())
}

/// Execute the update command
pub async fn update(
    repo: &RawRepository,
    id: &str,
    changes: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match repo.update(id, patch_from_json(changes)?).await? {
        Some(doc) => output::print_document(&doc.into_value(), format),
        None => output::print_warning(&format!("Document '{}' not found", id)),
    }
    Ok(())
}

/// Execute the delete command
pub async fn delete(repo: &RawRepository, id: &str) -> Result<(), AppError> {
    if repo.delete(id).await? {
        output::print_success(&format!("Document '{}' deleted", id));
    } else {
        output::print_warning(&format!("Document '{}' not found", id));
    }
    Ok(())
}
