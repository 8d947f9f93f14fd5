//! ORDER BY / LIMIT / OFFSET fragments

use crate::query::{OrderBy, Pagination};

/// Build the ORDER BY fragment, with its leading space
///
/// Column names are single-quoted. Returns an empty string when there is
/// nothing to order by.
pub fn build_order_by_clause(order: &[OrderBy]) -> String {
    if order.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = order
        .iter()
        .map(|spec| format!("'{}' {}", spec.column, spec.direction.keyword()))
        .collect();
    format!(" ORDER BY {}", parts.join(", "))
}

/// Build the LIMIT and OFFSET fragments, each with its leading space
pub fn build_pagination_clause(pagination: &Pagination) -> String {
    let mut clause = String::new();
    if let Some(limit) = &pagination.limit {
        clause.push_str(&format!(" LIMIT {}", limit));
    }
    if let Some(offset) = &pagination.offset {
        clause.push_str(&format!(" OFFSET {}", offset));
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::OrderDirection;

    #[test]
    fn test_order_by_empty() {
        assert_eq!(build_order_by_clause(&[]), "");
    }

    #[test]
    fn test_order_by_columns() {
        let order = vec![
            OrderBy::new("age", OrderDirection::Desc),
            OrderBy::new("name", OrderDirection::Asc),
        ];
        assert_eq!(build_order_by_clause(&order), " ORDER BY 'age' DESC, 'name' ASC");
    }

    #[test]
    fn test_pagination() {
        let pagination = Pagination {
            limit: Some(5.into()),
            offset: Some(10.into()),
        };
        assert_eq!(build_pagination_clause(&pagination), " LIMIT 5 OFFSET 10");
        assert_eq!(build_pagination_clause(&Pagination::default()), "");
    }
}
