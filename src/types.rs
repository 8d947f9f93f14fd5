//! Core type definitions
//!
//! Includes the entity descriptor ([`Mapper`]) and table name resolution.

use serde::{Deserialize, Serialize};

use crate::sql::sanitize::quote_identifier;

/// A row as returned by the executor, or a record as passed in by callers
pub type Record = serde_json::Map<String, serde_json::Value>;

fn default_id_attribute() -> String {
    "id".to_string()
}

/// Describes how an entity maps onto a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapper {
    /// Entity name
    pub name: String,
    /// Unquoted table name, e.g. `/AZR/WB_QUEUE`
    pub table: String,
    /// Primary key column (default: `id`)
    #[serde(rename = "idAttribute", default = "default_id_attribute")]
    pub id_attribute: String,
}

impl Mapper {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            id_attribute: default_id_attribute(),
        }
    }

    /// Set the primary key column
    pub fn id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = id_attribute.into();
        self
    }
}

/// Resolves the table identifier used in statements for a mapper
pub trait TableResolver: Send + Sync {
    fn table_name(&self, mapper: &Mapper) -> String;
}

/// Double-quotes the mapper's table name
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotedTableResolver;

impl TableResolver for QuotedTableResolver {
    fn table_name(&self, mapper: &Mapper) -> String {
        quote_identifier(&mapper.table)
    }
}

impl<F> TableResolver for F
where
    F: Fn(&Mapper) -> String + Send + Sync,
{
    fn table_name(&self, mapper: &Mapper) -> String {
        self(mapper)
    }
}
