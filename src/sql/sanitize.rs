//! SQL identifier utilities

use std::sync::LazyLock;

use regex::Regex;

// A bare identifier, or a double-quoted one with doubled inner quotes.
static COLUMN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[A-Za-z_][A-Za-z0-9_$#]*|"(?:[^"]|"")+")$"#).expect("valid column regex")
});

/// Quote a SQL identifier
///
/// # Example
/// ```
/// use hana_query_builder::sql::quote_identifier;
///
/// assert_eq!(quote_identifier("/AZR/WB_QUEUE"), "\"/AZR/WB_QUEUE\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    let escaped = identifier.replace('"', "\"\"");
    format!("\"{}\"", escaped)
}

/// Validate a column name used as a raw expression argument (e.g. `SUM(<field>)`)
///
/// Accepts bare identifiers (`PRICE`, `item_count`) and double-quoted
/// identifiers (`"Unit Price"`).
pub fn validate_column_name(field: &str) -> Result<(), String> {
    if field.trim().is_empty() {
        return Err("field must not be empty".to_string());
    }
    if !COLUMN_NAME.is_match(field) {
        return Err(format!("field '{}' is not a column name", field));
    }
    Ok(())
}
