//! # hana-query-builder
//!
//! Compiles JSON-shaped queries into SQL clauses and normalizes records for
//! INSERT/UPDATE statements, for a SAP HANA style data adapter.
//!
//! ## Features
//!
//! - **Filter Compilation**: implicit equality, explicit operators (`==`, `gte`, `inq`, `ilike`, ...) and nested `and`/`or` groups
//! - **Ordering and Pagination**: `order`/`orderBy`/`sort`, `limit`, `offset`/`skip`
//! - **Record Normalization**: sparse records aligned to one sorted column list
//! - **Pluggable Execution**: statements run through a caller-supplied [`Executor`]
//!
//! ## Quick Start
//!
//! ```rust
//! use hana_query_builder::compile_clause;
//! use serde_json::json;
//!
//! let clause = compile_clause(&json!({
//!     "where": {
//!         "age": {">=": 20, "<": 50},
//!         "or": [{"id": {"=": 1}}, {"id": {"==": 5}}]
//!     }
//! }));
//! assert_eq!(clause, " WHERE (age >= 20 AND age < 50) AND (id = 1 OR id = 5)");
//! ```
//!
//! ## Running Statements
//!
//! ```rust,no_run
//! use hana_query_builder::{Adapter, AdapterConfig, Executor, Mapper, Response, Result};
//! use serde_json::json;
//!
//! struct Driver;
//!
//! impl Executor for Driver {
//!     async fn execute(&self, _sql: &str) -> Result<Response> {
//!         // hand the statement to the database driver
//!         Ok(Response::Affected(1))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let adapter = Adapter::new(Driver, AdapterConfig::default());
//!     let jobs = Mapper::new("WB_Queue", "/AZR/WB_QUEUE").id_attribute("WB_QUEUE_ID");
//!
//!     adapter.create(&jobs, &json!([{"WB_QUEUE_ID": 1}, {"WB_QUEUE_ID": 2}])).await?;
//!     let open = adapter.count(&jobs, &json!({"PROCESS_STATUS": "open"})).await?;
//!     println!("{} open jobs", open);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use hana_query_builder::AdapterConfig;
//! use std::time::Duration;
//!
//! let config = AdapterConfig::builder()
//!     .host("127.0.0.1")
//!     .port(30015)
//!     .user("SYSTEM")
//!     .password("secret")
//!     .max_connections(50)                       // Default pool size
//!     .request_timeout(Duration::from_secs(30))  // Default statement timeout
//!     .debug(false)                              // Log statements at debug level
//!     .build();
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod executor;
pub mod filter;
pub mod query;
pub mod sql;
pub mod types;

// Re-export main types for convenience
pub use adapter::Adapter;
pub use config::{AdapterConfig, AdapterConfigBuilder, ConnectionSettings, PoolOptions};
pub use error::{AdapterError, Result};
pub use executor::{Executor, Response};
pub use filter::{BooleanGroup, Combinator, ConditionLeaf, FieldObject, FilterNode, Operand};
pub use query::{OrderBy, OrderDirection, Pagination, Query, compile_clause};
pub use types::{Mapper, QuotedTableResolver, Record, TableResolver};

// Re-export SQL utilities for advanced users
pub use sql::dml::{PreparedInsert, prepare_assignments, prepare_insert};
pub use sql::operator::{OPERATORS, lookup_operator, resolve_operator};
