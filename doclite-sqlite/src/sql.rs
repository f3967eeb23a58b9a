//! SQL statement construction for the SQLite backend.
//!
//! Collection names are caller-supplied strings used as table names, so they
//! are always emitted through [`quote_identifier`] rather than interpolated
//! raw. Document, selector, and patch values always travel as bound
//! parameters, never as statement text.

use libsql::Value as SqlValue;
use serde_json::Value;

use doclite_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    selector::Selector,
};

/// Counts the tables owned by the database, for the catalog emptiness check.
pub(crate) const COUNT_TABLES: &str =
    "SELECT count(*) FROM sqlite_master WHERE type = 'table'";

/// Probes the catalog for a collection's table, with the name bound as data.
pub(crate) const TABLE_EXISTS: &str =
    "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";

/// Quotes an arbitrary string as a SQL identifier.
///
/// Double quotes inside the name are doubled, so any string (including SQL
/// metacharacters) names exactly one table and round-trips losslessly.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Idempotent DDL materializing a collection's table.
pub(crate) fn create_table(collection: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (store TEXT)",
        quote_identifier(collection)
    )
}

/// Inserts one serialized document as a new row.
pub(crate) fn insert_document(collection: &str) -> String {
    format!(
        "INSERT INTO {} (store) VALUES (?1)",
        quote_identifier(collection)
    )
}

/// Overwrites one row's serialization, keyed by its stable rowid.
pub(crate) fn overwrite_row(collection: &str) -> String {
    format!(
        "UPDATE {} SET store = ?1 WHERE rowid = ?2",
        quote_identifier(collection)
    )
}

/// Deletes one row, keyed by its stable rowid.
pub(crate) fn delete_row(collection: &str) -> String {
    format!(
        "DELETE FROM {} WHERE rowid = ?1",
        quote_identifier(collection)
    )
}

/// Builds the selector-matching query and its bound parameters.
///
/// Each selector pair becomes its own `EXISTS` subquery over `json_tree` of
/// the row's serialization, so a key-equals-value condition may match at any
/// nesting depth and all pairs must hold simultaneously for the same row.
/// `IS` comparison makes `null`-valued pairs match stored JSON nulls.
///
/// # Errors
///
/// Returns an error if a condition's value has no bound-parameter
/// representation (see [`bind_value`]).
pub(crate) fn select_rows(
    collection: &str,
    selector: &Selector,
) -> DocumentStoreResult<(String, Vec<SqlValue>)> {
    let table = quote_identifier(collection);
    let mut statement = format!("SELECT rowid, store FROM {table}");
    let mut params = Vec::with_capacity(selector.len() * 2);

    for (index, (field, value)) in selector.iter().enumerate() {
        let connective = if index == 0 { " WHERE " } else { " AND " };
        let key_slot = index * 2 + 1;
        let value_slot = index * 2 + 2;

        statement.push_str(connective);
        statement.push_str(&format!(
            "EXISTS (SELECT 1 FROM json_tree({table}.store) \
             WHERE json_tree.key IS ?{key_slot} AND json_tree.value IS ?{value_slot})"
        ));

        params.push(SqlValue::Text(field.clone()));
        params.push(bind_value(value)?);
    }

    Ok((statement, params))
}

/// Converts a JSON value to its bound-parameter representation.
///
/// Scalars map to their SQL counterparts the way `json_tree` surfaces them
/// (booleans as integers 1/0, `null` as SQL NULL); arrays and objects bind as
/// their minified JSON text, which is how `json_tree` renders container nodes.
pub(crate) fn bind_value(value: &Value) -> DocumentStoreResult<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(integer), _) => SqlValue::Integer(integer),
            (None, Some(real)) => SqlValue::Real(real),
            (None, None) => {
                return Err(DocumentStoreError::InvalidSelector(format!(
                    "number {number} has no SQL representation"
                )));
            }
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        container => SqlValue::Text(serde_json::to_string(container)?),
    })
}
