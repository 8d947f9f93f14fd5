//! SQL generation utilities
//!
//! Value formatting, WHERE/ORDER BY compilation, and DML statement text.

pub mod condition;
pub mod dml;
pub mod operator;
pub mod order;
pub mod sanitize;

pub use condition::build_condition_clause;
pub use dml::{DmlGenerator, PreparedInsert, prepare_assignments, prepare_insert};
pub use operator::{
    CASE_INSENSITIVE_OPERATORS, OPERATORS, compile_condition, format_scalar, lookup_operator,
    resolve_operator,
};
pub use order::{build_order_by_clause, build_pagination_clause};
pub use sanitize::{quote_identifier, validate_column_name};
