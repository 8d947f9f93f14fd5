//! Statement execution seam
//!
//! The adapter never talks to a driver directly. Callers supply an
//! [`Executor`] that runs finished SQL text and reports what came back;
//! pooling, connection reuse and driver errors are its concern.

use std::future::Future;

use crate::error::Result;
use crate::types::Record;

/// What a statement produced
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Result rows of a query
    Rows(Vec<Record>),
    /// Number of rows touched by INSERT, UPDATE or DELETE
    Affected(u64),
}

impl Response {
    /// Rows of a query response; empty for an affected-count response
    pub fn into_rows(self) -> Vec<Record> {
        match self {
            Response::Rows(rows) => rows,
            Response::Affected(_) => Vec::new(),
        }
    }

    /// Affected row count; the row count for a query response
    pub fn affected(&self) -> u64 {
        match self {
            Response::Rows(rows) => rows.len() as u64,
            Response::Affected(count) => *count,
        }
    }
}

/// Runs SQL text against a database
///
/// Implementations are shared across concurrent calls and map their driver
/// failures to [`AdapterError::Execution`](crate::AdapterError::Execution).
pub trait Executor: Send + Sync {
    fn execute(&self, sql: &str) -> impl Future<Output = Result<Response>> + Send;
}

impl<E: Executor> Executor for std::sync::Arc<E> {
    fn execute(&self, sql: &str) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(sql)
    }
}
