//! In-process evaluation of filters and sort orders over JSON documents.
//!
//! Mixed-type ordering follows PostgreSQL `jsonb`:
//! `null < string < number < boolean < array < object`. Strings compare
//! by code point, so `"Banana" < "apple"`; PostgreSQL compares them with
//! the database collation, which can order such keys differently.

use std::cmp::Ordering;

use serde_json::Value;

use docrepo_core::types::path;
use docrepo_core::types::{Filter, FilterField, FilterOp, Sort, SortDirection};

/// Whether `doc` satisfies every condition of `filter`.
pub fn matches(doc: &Value, filter: &Filter) -> bool {
    filter.conditions().iter().all(|c| matches_field(doc, c))
}

fn matches_field(doc: &Value, condition: &FilterField) -> bool {
    let actual = path::lookup(doc, &condition.field);
    let expected = condition.value.to_json();

    match condition.effective_op() {
        FilterOp::Eq => actual.is_some_and(|a| json_eq(a, &expected)),
        FilterOp::Ne => !actual.is_some_and(|a| json_eq(a, &expected)),
        FilterOp::Gt => same_type_cmp(actual, &expected) == Some(Ordering::Greater),
        FilterOp::Gte => matches!(
            same_type_cmp(actual, &expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lt => same_type_cmp(actual, &expected) == Some(Ordering::Less),
        FilterOp::Lte => matches!(
            same_type_cmp(actual, &expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::Like => match (actual.and_then(Value::as_str), expected.as_str()) {
            (Some(text), Some(pattern)) => like(text, pattern, false),
            _ => false,
        },
        FilterOp::ILike => match (actual.and_then(Value::as_str), expected.as_str()) {
            (Some(text), Some(pattern)) => like(text, pattern, true),
            _ => false,
        },
        FilterOp::In => match (actual, condition.value.as_list()) {
            (Some(a), Some(candidates)) => candidates.iter().any(|c| json_eq(a, c)),
            _ => false,
        },
        FilterOp::IsNull => actual.is_none_or(Value::is_null),
        FilterOp::IsNotNull => actual.is_some_and(|a| !a.is_null()),
    }
}

/// Equality with numbers compared by value (`1 == 1.0`).
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| json_eq(v, other)))
        }
        _ => a == b,
    }
}

fn same_type_cmp(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    let actual = actual?;
    if type_rank(actual) != type_rank(expected) || actual.is_null() {
        return None;
    }
    Some(compare(actual, expected))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(a, b)| compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()).then_with(|| {
            x.iter()
                .zip(y.iter())
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| compare(va, vb)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        }),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare two documents by a sort order. Missing fields sort as
/// `null`.
pub fn compare_by(a: &Value, b: &Value, sort: &Sort) -> Ordering {
    for key in sort.fields() {
        let x = path::lookup(a, &key.field).unwrap_or(&Value::Null);
        let y = path::lookup(b, &key.field).unwrap_or(&Value::Null);
        let ordering = match key.direction {
            SortDirection::Asc => compare(x, y),
            SortDirection::Desc => compare(y, x),
        };
        if ordering.is_ne() {
            return ordering;
        }
    }
    Ordering::Equal
}

/// SQL `LIKE`: `%` matches any run of characters, `_` exactly one,
/// `\` escapes the next character.
pub fn like(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let fold = |s: &str| {
        if case_insensitive {
            s.to_lowercase().chars().collect::<Vec<_>>()
        } else {
            s.chars().collect::<Vec<_>>()
        }
    };
    let text = fold(text);
    let pattern = fold(pattern);

    // (pattern index, text index) to resume from after the last '%'
    let mut backtrack: Option<(usize, usize)> = None;
    let (mut p, mut t) = (0usize, 0usize);
    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                p += 1;
                backtrack = Some((p, t));
                continue;
            }
            Some('_') => {
                p += 1;
                t += 1;
                continue;
            }
            Some('\\') if p + 1 < pattern.len() && pattern[p + 1] == text[t] => {
                p += 2;
                t += 1;
                continue;
            }
            Some(c) if *c != '\\' && *c == text[t] => {
                p += 1;
                t += 1;
                continue;
            }
            _ => {}
        }
        match backtrack {
            Some((bp, bt)) => {
                p = bp;
                t = bt + 1;
                backtrack = Some((bp, bt + 1));
            }
            None => return false,
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}
