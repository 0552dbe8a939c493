//! Table and JSON output formatting for CLI commands.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;

use docrepo_core::types::{ID_FIELD, Pagination};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Render a cell. Strings print bare, nested values as compact JSON.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Print documents as a table with one column per top-level field, `_id`
/// first, or as a JSON array.
pub fn print_documents(docs: &[Value], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if docs.is_empty() {
                println!("No results found.");
                return;
            }
            let fields: BTreeSet<&str> = docs
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|map| map.keys().map(String::as_str))
                .filter(|key| *key != ID_FIELD)
                .collect();
            let columns: Vec<&str> = std::iter::once(ID_FIELD).chain(fields).collect();

            let mut builder = Builder::default();
            builder.push_record(columns.iter().map(|c| c.to_string()));
            for doc in docs {
                builder.push_record(columns.iter().map(|c| cell(doc.get(*c))));
            }
            println!("{}", builder.build());
        }
        OutputFormat::Json => print_json(docs),
    }
}

/// Print a single document in the selected format
pub fn print_document(doc: &Value, format: OutputFormat) {
    print_documents(std::slice::from_ref(doc), format);
}

/// Print pagination metadata below a table listing
pub fn print_pagination(pagination: &Pagination) {
    print_kv("Page", &format!("{} of {}", pagination.page, pagination.total_pages));
    print_kv("Page size", &pagination.page_size.to_string());
    print_kv("Total", &pagination.total.to_string());
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{}", json);
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
