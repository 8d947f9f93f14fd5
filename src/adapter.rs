//! Adapter - runs compiled statements for mapped entities
//!
//! Every operation builds its complete statement text first, so compile
//! errors surface before anything reaches the executor.

use futures::future::try_join_all;
use serde_json::Value;

use crate::config::AdapterConfig;
use crate::error::{AdapterError, Result};
use crate::executor::{Executor, Response};
use crate::query::compile_clause;
use crate::sql::dml::{DmlGenerator, prepare_assignments, prepare_insert};
use crate::sql::sanitize::validate_column_name;
use crate::types::{Mapper, QuotedTableResolver, Record, TableResolver};

/// Entity adapter over an executor
///
/// Operations must be awaited inside a Tokio 1.x runtime with the time
/// driver enabled, since every statement runs under `tokio::time::timeout`.
pub struct Adapter<E, R = QuotedTableResolver> {
    executor: E,
    tables: R,
    config: AdapterConfig,
}

impl<E: Executor> Adapter<E> {
    /// Create an adapter that double-quotes mapper table names
    pub fn new(executor: E, config: AdapterConfig) -> Self {
        Self {
            executor,
            tables: QuotedTableResolver,
            config,
        }
    }
}

impl<E: Executor, R: TableResolver> Adapter<E, R> {
    /// Replace the table name resolver
    pub fn with_table_resolver<T: TableResolver>(self, tables: T) -> Adapter<E, T> {
        Adapter {
            executor: self.executor,
            tables,
            config: self.config,
        }
    }

    /// Get a reference to the executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Resolved table identifier for a mapper
    pub fn table(&self, mapper: &Mapper) -> String {
        self.tables.table_name(mapper)
    }

    async fn execute(&self, sql: &str) -> Result<Response> {
        if self.config.debug {
            tracing::info!(sql, "executing statement");
        } else {
            tracing::debug!(sql, "executing statement");
        }

        let timeout = self.config.pool.request_timeout();
        let result = match tokio::time::timeout(timeout, self.executor.execute(sql)).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::execution(format!(
                "statement timed out after {}ms",
                timeout.as_millis()
            ))),
        };

        if let Err(e) = &result {
            tracing::warn!(sql, error = %e, "statement failed");
        }
        result
    }

    // Runs bulk statements concurrently; all must touch at least one row.
    async fn execute_all(
        &self,
        operation: &'static str,
        statements: &[String],
    ) -> Result<Vec<Response>> {
        let responses = try_join_all(statements.iter().map(|sql| self.execute(sql))).await?;
        if responses.iter().any(|response| response.affected() == 0) {
            tracing::warn!(
                operation,
                statements = statements.len(),
                "bulk statement affected no rows"
            );
            return Err(AdapterError::NoRowsAffected {
                operation,
                sql: statements.join("\n"),
            });
        }
        Ok(responses)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Count records matching `query`
    pub async fn count(&self, mapper: &Mapper, query: &Value) -> Result<u64> {
        let table = self.table(mapper);
        let sql = DmlGenerator::new(&table, &mapper.id_attribute).count(&compile_clause(query));
        let response = self.execute(&sql).await?;

        let value = first_column(response, "COUNT")?;
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| AdapterError::unexpected_response(format!("count() returned {}", value)))
    }

    /// Sum `field` over records matching `query`
    ///
    /// Returns the value as reported by the database (`null` when no rows match).
    pub async fn sum(&self, mapper: &Mapper, field: &str, query: &Value) -> Result<Value> {
        validate_column_name(field).map_err(AdapterError::invalid_field)?;

        let table = self.table(mapper);
        let sql =
            DmlGenerator::new(&table, &mapper.id_attribute).sum(field, &compile_clause(query));
        let response = self.execute(&sql).await?;
        first_column(response, "SUM")
    }

    /// Find one record by primary key
    pub async fn find(&self, mapper: &Mapper, id: &Value) -> Result<Option<Record>> {
        let table = self.table(mapper);
        let sql = DmlGenerator::new(&table, &mapper.id_attribute).select_by_id(id);
        let response = self.execute(&sql).await?;
        Ok(response.into_rows().into_iter().next())
    }

    /// Find all records matching `query`
    pub async fn find_all(&self, mapper: &Mapper, query: &Value) -> Result<Vec<Record>> {
        let table = self.table(mapper);
        let sql = DmlGenerator::new(&table, &mapper.id_attribute).select(&compile_clause(query));
        Ok(self.execute(&sql).await?.into_rows())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert one record or a list of records, one statement per record
    ///
    /// Returns the records that were passed in.
    pub async fn create(&self, mapper: &Mapper, props: &Value) -> Result<Value> {
        let prepared = prepare_insert(props)?;
        let statements = prepared.insert_statements(&self.table(mapper));
        self.execute_all("Creation", &statements).await?;
        Ok(props.clone())
    }

    /// Insert a list of records
    pub async fn create_many(&self, mapper: &Mapper, records: &Value) -> Result<Value> {
        self.create(mapper, records).await
    }

    /// Update one record by primary key; returns the affected row count
    pub async fn update(&self, mapper: &Mapper, id: &Value, props: &Value) -> Result<u64> {
        let assignments = prepare_assignments(props)?;
        let table = self.table(mapper);
        let sql = DmlGenerator::new(&table, &mapper.id_attribute).update_by_id(&assignments, id);
        Ok(self.execute(&sql).await?.affected())
    }

    /// Apply `props` to every record matching `query`; returns the affected row count
    pub async fn update_all(&self, mapper: &Mapper, props: &Value, query: &Value) -> Result<u64> {
        let assignments = prepare_assignments(props)?;
        let table = self.table(mapper);
        let sql = DmlGenerator::new(&table, &mapper.id_attribute)
            .update(&assignments, &compile_clause(query));
        Ok(self.execute(&sql).await?.affected())
    }

    /// Update each record by its own primary key; returns the number of records updated
    pub async fn update_many(&self, mapper: &Mapper, records: &[Value]) -> Result<usize> {
        let table = self.table(mapper);
        let dml = DmlGenerator::new(&table, &mapper.id_attribute);
        let statements = records
            .iter()
            .map(|record| -> Result<String> {
                let assignments = prepare_assignments(record)?;
                let id = record.get(&mapper.id_attribute).unwrap_or(&Value::Null);
                Ok(dml.update_by_id(&assignments, id))
            })
            .collect::<Result<Vec<_>>>()?;

        let responses = self.execute_all("Update", &statements).await?;
        Ok(responses.len())
    }

    /// Delete one record by primary key; returns the affected row count
    pub async fn destroy(&self, mapper: &Mapper, id: &Value) -> Result<u64> {
        let table = self.table(mapper);
        let sql = DmlGenerator::new(&table, &mapper.id_attribute).delete_by_id(id);
        Ok(self.execute(&sql).await?.affected())
    }

    /// Delete every record matching `query`; returns the affected row count
    pub async fn destroy_all(&self, mapper: &Mapper, query: &Value) -> Result<u64> {
        let table = self.table(mapper);
        let sql = DmlGenerator::new(&table, &mapper.id_attribute).delete(&compile_clause(query));
        Ok(self.execute(&sql).await?.affected())
    }
}

// Value of `column` (any casing) in the first row of a query response.
fn first_column(response: Response, column: &str) -> Result<Value> {
    let rows = match response {
        Response::Rows(rows) => rows,
        other => {
            return Err(AdapterError::unexpected_response(format!(
                "expected rows with a {} column, got {:?}",
                column, other
            )));
        }
    };

    rows.into_iter()
        .next()
        .and_then(|row| {
            row.into_iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        })
        .ok_or_else(|| {
            AdapterError::unexpected_response(format!("no {} column in response", column))
        })
}
