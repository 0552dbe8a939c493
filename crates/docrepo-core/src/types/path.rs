//! Dotted field paths (`address.city`) into JSON documents.

use serde_json::{Map, Value};

/// Split a dotted path into its segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Look up the value at a dotted path. Array elements are addressed by index.
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).into_iter().try_fold(doc, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Insert a value at a dotted path, creating intermediate objects.
///
/// An intermediate non-object value is replaced by an object.
pub fn insert(target: &mut Map<String, Value>, path: &str, value: Value) {
    let parts = segments(path);
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}
