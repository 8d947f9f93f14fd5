//! Query objects
//!
//! A query is the JSON object callers pass to `find_all`, `count`,
//! `destroy_all` and friends:
//!
//! ```json
//! {
//!   "where": { "status": "published", "author": { "in": ["bob", "alice"] } },
//!   "orderBy": [["date_published", "DESC"], ["title"]],
//!   "limit": 2,
//!   "offset": 4
//! }
//! ```
//!
//! Keys other than the reserved ones are treated as extra `where` conditions.

use serde_json::{Map, Number, Value};

use crate::filter::{BooleanGroup, Combinator, FilterNode};
use crate::sql::condition::build_condition_clause;
use crate::sql::order::{build_order_by_clause, build_pagination_clause};

/// Top-level keys that never become conditions
pub const RESERVED_KEYWORDS: &[&str] =
    &["order", "orderBy", "sort", "limit", "offset", "skip", "where"];

/// Keys read for ordering, highest priority first
const ORDER_KEYS: &[&str] = &["order", "orderBy", "sort"];

/// Sort direction of one ORDER BY column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
    /// Any other direction text, already upper-cased (e.g. `DESC NULLS LAST`)
    Other(String),
}

impl OrderDirection {
    /// Parse a direction; an empty direction is ascending
    pub fn parse(direction: &str) -> Self {
        let direction = direction.split_whitespace().collect::<Vec<_>>().join(" ");
        match direction.to_uppercase().as_str() {
            "" | "ASC" => Self::Asc,
            "DESC" => Self::Desc,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Other(keyword) => keyword,
        }
    }
}

/// One ORDER BY column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    // "name", "name desc" or "name desc nulls last"
    fn parse_token(token: &str) -> Option<Self> {
        let token = token.trim();
        let (column, direction) = token.split_once(char::is_whitespace).unwrap_or((token, ""));
        if column.is_empty() {
            return None;
        }
        Some(Self::new(column, OrderDirection::parse(direction)))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(token) => Self::parse_token(token),
            Value::Array(pair) => {
                let column = pair.first()?.as_str()?;
                let direction = pair
                    .get(1)
                    .and_then(Value::as_str)
                    .map(OrderDirection::parse)
                    .unwrap_or_default();
                Some(Self::new(column, direction))
            }
            _ => None,
        }
    }
}

/// LIMIT / OFFSET of a query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pagination {
    pub limit: Option<Number>,
    pub offset: Option<Number>,
}

/// A parsed query: filter tree, ordering and pagination
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filter: Option<FilterNode>,
    pub order: Vec<OrderBy>,
    pub pagination: Pagination,
}

impl Query {
    /// Parse a JSON query object
    ///
    /// Anything that is not a JSON object parses to an empty query.
    pub fn from_value(query: &Value) -> Self {
        let Value::Object(query) = query else {
            return Self::default();
        };

        Self {
            filter: parse_filter(query),
            order: parse_order(query),
            pagination: Pagination {
                limit: query.get("limit").and_then(as_number),
                offset: query
                    .get("skip")
                    .and_then(as_number)
                    .or_else(|| query.get("offset").and_then(as_number)),
            },
        }
    }

    /// Render the WHERE, ORDER BY, LIMIT and OFFSET fragments
    ///
    /// Every fragment carries its own leading space, so the result can be
    /// appended directly after `FROM <table>`.
    pub fn to_clause(&self) -> String {
        let mut clause = match &self.filter {
            Some(FilterNode::Raw(raw)) => raw_where_clause(raw),
            Some(filter) => {
                let body = build_condition_clause(filter);
                if body.is_empty() {
                    String::new()
                } else {
                    format!(" WHERE {}", body)
                }
            }
            None => String::new(),
        };
        clause.push_str(&build_order_by_clause(&self.order));
        clause.push_str(&build_pagination_clause(&self.pagination));
        clause
    }
}

/// Compile a JSON query object into its SQL clause suffix
///
/// # Example
/// ```
/// use hana_query_builder::compile_clause;
/// use serde_json::json;
///
/// let clause = compile_clause(&json!({
///     "role": "admin",
///     "orderBy": [["age", "DESC"], ["name"]],
///     "limit": 5,
///     "skip": 10
/// }));
/// assert_eq!(clause, " WHERE role = 'admin' ORDER BY 'age' DESC, 'name' ASC LIMIT 5 OFFSET 10");
/// ```
pub fn compile_clause(query: &Value) -> String {
    Query::from_value(query).to_clause()
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

// Non-reserved top-level keys are merged with `where`; a `where` object
// overrides them key by key.
fn parse_filter(query: &Map<String, Value>) -> Option<FilterNode> {
    let mut conditions: Map<String, Value> = query
        .iter()
        .filter(|(key, _)| !RESERVED_KEYWORDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let items = match query.get("where") {
        Some(Value::String(raw)) if !raw.is_empty() => {
            return Some(FilterNode::Raw(raw.clone()));
        }
        Some(Value::Object(filter)) => {
            for (key, value) in filter {
                conditions.insert(key.clone(), value.clone());
            }
            vec![Value::Object(conditions)]
        }
        Some(Value::Array(filter)) => {
            let mut items = filter.clone();
            if !conditions.is_empty() {
                items.push(Value::Object(conditions));
            }
            items
        }
        _ => vec![Value::Object(conditions)],
    };

    Some(FilterNode::Group(BooleanGroup::from_values(Combinator::And, &items)))
}

fn parse_order(query: &Map<String, Value>) -> Vec<OrderBy> {
    let source = ORDER_KEYS.iter().find_map(|key| match query.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(OrderSource::Text(s)),
        Some(Value::Array(items)) if !items.is_empty() => Some(OrderSource::List(items)),
        _ => None,
    });

    match source {
        Some(OrderSource::Text(text)) => text.split(',').filter_map(OrderBy::parse_token).collect(),
        Some(OrderSource::List(items)) => items.iter().filter_map(OrderBy::from_value).collect(),
        None => Vec::new(),
    }
}

enum OrderSource<'a> {
    Text(&'a str),
    List(&'a [Value]),
}

// A raw string that already starts with WHERE is the whole fragment.
fn raw_where_clause(raw: &str) -> String {
    let starts_with_where = raw
        .trim_start()
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("WHERE"));
    if starts_with_where {
        raw.to_string()
    } else {
        format!(" WHERE {}", raw)
    }
}
