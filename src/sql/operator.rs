//! Operator table and value formatting
//!
//! Shared leaf utilities used by both the filter compiler and the statement
//! builders: quoting scalar values and mapping symbolic operator tokens to SQL.

use serde_json::Value;

/// The canonical equality token. Field objects keyed by it keep the enclosing field.
pub const OPERATOR_EQUAL: &str = "==";

/// Literal condition emitted for membership tests against an empty list
pub const UNATTAINABLE_CONDITION: &str = "1 = 0";

/// Accepted operator tokens (upper-case) and the SQL operator each maps to
pub const OPERATORS: &[(&str, &str)] = &[
    ("=", "="),
    ("==", "="),
    ("EQ", "="),
    ("<>", "<>"),
    ("!=", "<>"),
    ("NEQ", "<>"),
    (">", ">"),
    ("GT", ">"),
    (">=", ">="),
    ("GTE", ">="),
    ("<", "<"),
    ("LT", "<"),
    ("<=", "<="),
    ("LTE", "<="),
    ("IN", "IN"),
    ("INQ", "IN"),
    ("NOTIN", "NOT IN"),
    ("NIN", "NOT IN"),
    ("LIKE", "LIKE"),
    ("NLIKE", "NOT LIKE"),
    ("ILIKE", "LIKE"),
    ("LIKEI", "LIKE"),
];

/// Tokens whose comparison lowers both operands
pub const CASE_INSENSITIVE_OPERATORS: &[&str] = &["ILIKE", "LIKEI"];

/// Look up an operator token, ignoring case
///
/// Returns `None` for tokens that are not in [`OPERATORS`].
pub fn lookup_operator(token: &str) -> Option<&'static str> {
    OPERATORS
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(token))
        .map(|(_, sql)| *sql)
}

/// Whether `token` is one of the accepted operator aliases
pub fn is_operator(token: &str) -> bool {
    lookup_operator(token).is_some()
}

/// Convert an operator token to the SQL operator it stands for
///
/// Unknown tokens are upper-cased and passed through, so callers may use
/// operators the table does not list.
///
/// # Example
/// ```
/// use hana_query_builder::sql::resolve_operator;
///
/// assert_eq!(resolve_operator("gte"), ">=");
/// assert_eq!(resolve_operator("nin"), "NOT IN");
/// assert_eq!(resolve_operator("between"), "BETWEEN");
/// ```
pub fn resolve_operator(token: &str) -> String {
    match lookup_operator(token) {
        Some(sql) => sql.to_string(),
        None => token.to_uppercase(),
    }
}

/// Whether the token resolves to `IN` or `NOT IN`
pub fn is_set_membership(token: &str) -> bool {
    matches!(resolve_operator(token).as_str(), "IN" | "NOT IN")
}

fn is_case_insensitive(token: &str) -> bool {
    CASE_INSENSITIVE_OPERATORS
        .iter()
        .any(|op| op.eq_ignore_ascii_case(token))
}

/// Format a JSON value as SQL literal text
///
/// Strings are wrapped in single quotes without escaping. Numbers and
/// booleans keep their literal form and null becomes `NULL`. Objects and
/// arrays are quoted as their JSON text.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "NULL".to_string(),
        Value::Array(_) | Value::Object(_) => format!("'{}'", value),
    }
}

/// Format an optional value; a missing value formats like null
pub fn format_optional(value: Option<&Value>) -> String {
    value.map(format_scalar).unwrap_or_else(|| "NULL".to_string())
}

/// Build one comparison from a field, an operator token and an already formatted value
pub fn compile_condition(field: &str, token: &str, value: &str) -> String {
    let operator = resolve_operator(token);
    if is_case_insensitive(token) {
        return format!("LOWER({}) {} LOWER({})", field, operator, value);
    }
    format!("{} {} {}", field, operator, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup_operator("gte"), Some(">="));
        assert_eq!(lookup_operator("GtE"), Some(">="));
        assert_eq!(lookup_operator("likei"), Some("LIKE"));
        assert_eq!(lookup_operator("between"), None);
    }

    #[test]
    fn test_every_alias_resolves() {
        for (alias, sql) in OPERATORS {
            assert_eq!(resolve_operator(&alias.to_lowercase()), *sql);
        }
    }

    #[test]
    fn test_unknown_operator_passes_through_uppercased() {
        assert_eq!(resolve_operator("similar to"), "SIMILAR TO");
        assert_eq!(resolve_operator("not in"), "NOT IN");
    }

    #[test]
    fn test_set_membership() {
        assert!(is_set_membership("in"));
        assert!(is_set_membership("INQ"));
        assert!(is_set_membership("nin"));
        assert!(is_set_membership("notin"));
        assert!(is_set_membership("not in"));
        assert!(!is_set_membership("like"));
    }

    #[test]
    fn test_format_scalar() {
        assert_eq!(format_scalar(&json!("Sean")), "'Sean'");
        assert_eq!(format_scalar(&json!(30)), "30");
        assert_eq!(format_scalar(&json!(29.99)), "29.99");
        assert_eq!(format_scalar(&json!(true)), "true");
        assert_eq!(format_scalar(&Value::Null), "NULL");
        assert_eq!(format_scalar(&json!({"a": 1})), "'{\"a\":1}'");
        assert_eq!(format_optional(None), "NULL");
    }

    #[test]
    fn test_compile_condition() {
        assert_eq!(compile_condition("age", ">=", "20"), "age >= 20");
        assert_eq!(compile_condition("name", "nlike", "'x'"), "name NOT LIKE 'x'");
        assert_eq!(
            compile_condition("name", "ilike", "'%john%doe%'"),
            "LOWER(name) LIKE LOWER('%john%doe%')"
        );
        assert_eq!(
            compile_condition("address", "LIKEI", "'street'"),
            "LOWER(address) LIKE LOWER('street')"
        );
    }
}
