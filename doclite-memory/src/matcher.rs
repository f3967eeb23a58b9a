//! In-process structural selector matching.
//!
//! This module evaluates selectors against documents the same way the SQL
//! backend's JSON decomposition does: a selector pair matches if any object
//! entry anywhere in the document's tree has that key with an equal value.
//! Array elements are traversed, but array indices never match selector keys.
//! Scalar comparison carries the SQL backend's numeric coercion: booleans
//! surface as the integers 1/0 and integers equal same-valued reals, while
//! strings, nulls, and containers compare by type.

use serde_json::Value;

use doclite_core::{document::Document, selector::Selector};

/// Returns `true` if every selector pair matches somewhere in the document.
///
/// An empty selector matches every document. Each pair is evaluated
/// independently over the whole tree; pairs do not have to match at the same
/// nesting level.
pub fn matches(document: &Document, selector: &Selector) -> bool {
    selector.iter().all(|(field, expected)| {
        document
            .fields()
            .iter()
            .any(|(key, value)| entry_matches(key, value, field, expected))
    })
}

fn entry_matches(key: &str, value: &Value, field: &str, expected: &Value) -> bool {
    (key == field && values_equal(value, expected)) || node_matches(value, field, expected)
}

// Booleans and numbers land in SQL as INTEGER/REAL, where comparison is
// numeric, so `true` equals 1 and 2 equals 2.0 on both backends.
fn values_equal(value: &Value, expected: &Value) -> bool {
    match (as_number(value), as_number(expected)) {
        (Some(left), Some(right)) => left == right,
        _ => value == expected,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(flag) => Some(f64::from(u8::from(*flag))),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

fn node_matches(node: &Value, field: &str, expected: &Value) -> bool {
    match node {
        Value::Object(entries) => entries
            .iter()
            .any(|(key, value)| entry_matches(key, value, field, expected)),
        Value::Array(items) => items
            .iter()
            .any(|item| node_matches(item, field, expected)),
        _ => false,
    }
}
