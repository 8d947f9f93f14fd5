//! DML statement generation
//!
//! Aligns sparse records to a shared column list for INSERT, builds SET
//! assignment lists for UPDATE, and assembles the full statement text for
//! every adapter operation.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::{AdapterError, Result};
use crate::sql::operator::format_scalar;
use crate::sql::sanitize::quote_identifier;

/// Records aligned to their sorted column union
///
/// Cells live in one row-major buffer of `rows * columns.len()` slots. A
/// `None` cell means the record had no value for that column.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInsert {
    pub columns: Vec<String>,
    cells: Vec<Option<String>>,
}

impl PreparedInsert {
    /// Number of rows
    pub fn len(&self) -> usize {
        if self.columns.is_empty() {
            0
        } else {
            self.cells.len() / self.columns.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Formatted values of one row, aligned with `columns`
    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        let width = self.columns.len();
        self.cells.get(index * width..(index + 1) * width)
    }

    /// Iterate over rows, each aligned with `columns`
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.cells.chunks(self.columns.len().max(1))
    }

    /// One `INSERT` statement per row; missing values become `NULL`
    pub fn insert_statements(&self, table: &str) -> Vec<String> {
        let columns = self.columns.join(", ");
        self.rows()
            .map(|row| {
                let values = row
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or("NULL"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("INSERT INTO {} ({}) VALUES ({})", table, columns, values)
            })
            .collect()
    }
}

/// Normalize one record or a list of records for INSERT
///
/// The column list is the sorted union of every record's keys. Processing
/// stops at the first `null` element.
///
/// # Errors
/// `EmptyInput` for an empty list, an empty object, or when no record
/// contributes a column.
///
/// # Example
/// ```
/// use hana_query_builder::prepare_insert;
/// use serde_json::json;
///
/// let prepared = prepare_insert(&json!([{"a": 1, "c": "3"}, {"a": 1, "b": 2}])).unwrap();
/// assert_eq!(prepared.columns, vec!["a", "b", "c"]);
/// assert_eq!(
///     prepared.row(0).unwrap(),
///     &[Some("1".to_string()), None, Some("'3'".to_string())]
/// );
/// ```
pub fn prepare_insert(records: &Value) -> Result<PreparedInsert> {
    let records: Vec<&Value> = match records {
        Value::Array(items) if items.is_empty() => {
            return Err(AdapterError::empty_input("no records given"));
        }
        Value::Array(items) => items.iter().take_while(|record| !record.is_null()).collect(),
        Value::Object(map) if map.is_empty() => {
            return Err(AdapterError::empty_input("record has no columns"));
        }
        Value::Null => return Err(AdapterError::empty_input("no records given")),
        record => vec![record],
    };

    let columns: Vec<String> = records
        .iter()
        .filter_map(|record| record.as_object())
        .flat_map(|map| map.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if columns.is_empty() {
        return Err(AdapterError::empty_input("records have no columns"));
    }

    let width = columns.len();
    let mut cells = vec![None; records.len() * width];
    for (row, record) in records.iter().enumerate() {
        let Some(map) = record.as_object() else {
            continue;
        };
        for (key, value) in map {
            if let Ok(position) = columns.binary_search(key) {
                cells[row * width + position] = Some(format_scalar(value));
            }
        }
    }

    Ok(PreparedInsert { columns, cells })
}

/// Build `column = value` assignments for UPDATE, in key order
///
/// # Errors
/// `EmptyAssignment` when the record has no keys or is not an object.
pub fn prepare_assignments(record: &Value) -> Result<Vec<String>> {
    let assignments: Vec<String> = record
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(key, value)| format!("{} = {}", key, format_scalar(value)))
                .collect()
        })
        .unwrap_or_default();

    if assignments.is_empty() {
        return Err(AdapterError::EmptyAssignment);
    }
    Ok(assignments)
}

/// Statement text builder for one (already resolved) table
#[derive(Debug, Clone)]
pub struct DmlGenerator<'a> {
    table: &'a str,
    id_attribute: &'a str,
}

impl<'a> DmlGenerator<'a> {
    /// `table` is used as given; `id_attribute` is quoted
    pub fn new(table: &'a str, id_attribute: &'a str) -> Self {
        Self {
            table,
            id_attribute,
        }
    }

    fn id_condition(&self, id: &Value) -> String {
        format!("{} = {}", quote_identifier(self.id_attribute), format_scalar(id))
    }

    pub fn select_by_id(&self, id: &Value) -> String {
        format!(
            "SELECT {table}.* FROM {table} WHERE {table}.{}",
            self.id_condition(id),
            table = self.table
        )
    }

    pub fn select(&self, clause: &str) -> String {
        format!("SELECT {table}.* FROM {table}{}", clause, table = self.table)
    }

    pub fn count(&self, clause: &str) -> String {
        format!("SELECT COUNT(*) AS COUNT FROM {}{}", self.table, clause)
    }

    /// `field` must already be validated as a column name
    pub fn sum(&self, field: &str, clause: &str) -> String {
        format!("SELECT SUM({}) AS SUM FROM {}{}", field, self.table, clause)
    }

    pub fn delete_by_id(&self, id: &Value) -> String {
        format!("DELETE FROM {} WHERE {}", self.table, self.id_condition(id))
    }

    pub fn delete(&self, clause: &str) -> String {
        format!("DELETE FROM {}{}", self.table, clause)
    }

    pub fn update_by_id(&self, assignments: &[String], id: &Value) -> String {
        format!(
            "UPDATE {} SET {} WHERE {}",
            self.table,
            assignments.join(", "),
            self.id_condition(id)
        )
    }

    pub fn update(&self, assignments: &[String], clause: &str) -> String {
        format!("UPDATE {} SET {}{}", self.table, assignments.join(", "), clause)
    }
}
