//! Condition building for SQL WHERE clauses
//!
//! Compiles a normalized [`FilterNode`] tree into a WHERE body (without the
//! `WHERE` keyword).
//!
//! Parenthesization follows nesting depth, not operator precedence: the
//! outermost group is depth 1, and every group or field object below it is
//! one level deeper, except groups written as an `and`/`or` key, which share
//! the depth of the object holding them. A group deeper than 1 joining more
//! than one fragment is wrapped; so is a field object deeper than 2 yielding
//! more than one condition.

use crate::filter::{BooleanGroup, ConditionLeaf, FieldObject, FilterNode, Operand};
use crate::sql::operator::{
    UNATTAINABLE_CONDITION, compile_condition, format_scalar, is_set_membership,
};

/// Build a WHERE body from a filter tree
///
/// Returns an empty string when the tree holds no conditions.
///
/// # Example
/// ```
/// use hana_query_builder::filter::{BooleanGroup, Combinator, FilterNode};
/// use hana_query_builder::sql::build_condition_clause;
/// use serde_json::json;
///
/// let tree = FilterNode::Group(BooleanGroup::from_values(
///     Combinator::And,
///     &[json!({"name": "Sean", "age": {"gte": 30}})],
/// ));
/// assert_eq!(build_condition_clause(&tree), "name = 'Sean' AND age >= 30");
/// ```
pub fn build_condition_clause(node: &FilterNode) -> String {
    match node {
        FilterNode::Group(group) => compile_group(group, 1),
        FilterNode::Fields(object) => compile_field_object(object, 2).join(" AND "),
        FilterNode::Condition(leaf) => compile_leaf(leaf),
        FilterNode::Raw(raw) => raw.clone(),
    }
}

/// Compile a boolean group at the given depth
pub fn compile_group(group: &BooleanGroup, depth: usize) -> String {
    let mut fragments = Vec::new();
    for child in &group.children {
        match child {
            FilterNode::Fields(object) => fragments.extend(compile_field_object(object, depth + 1)),
            FilterNode::Group(nested) => fragments.push(compile_group(nested, depth + 1)),
            FilterNode::Condition(leaf) => fragments.push(compile_leaf(leaf)),
            FilterNode::Raw(raw) => fragments.push(raw.clone()),
        }
    }
    fragments.retain(|fragment| !fragment.is_empty());

    let joined = fragments.join(&format!(" {} ", group.combinator.keyword()));
    if depth > 1 && fragments.len() > 1 {
        return format!("({})", joined);
    }
    joined
}

/// Compile the conditions of one field object at the given depth
///
/// Conditions of an object deeper than 2 are folded into a single
/// parenthesized `AND` fragment.
pub fn compile_field_object(object: &FieldObject, depth: usize) -> Vec<String> {
    let mut conditions = Vec::new();
    for entry in &object.entries {
        match entry {
            FilterNode::Fields(nested) => {
                conditions.extend(compile_field_object(nested, depth + 1));
            }
            FilterNode::Group(group) => conditions.push(compile_group(group, depth)),
            FilterNode::Condition(leaf) => conditions.push(compile_leaf(leaf)),
            FilterNode::Raw(raw) => conditions.push(raw.clone()),
        }
    }
    conditions.retain(|condition| !condition.is_empty());

    if depth > 2 && conditions.len() > 1 {
        return vec![format!("({})", conditions.join(" AND "))];
    }
    conditions
}

/// Compile a single comparison
pub fn compile_leaf(leaf: &ConditionLeaf) -> String {
    match &leaf.value {
        Operand::Scalar(value) => {
            compile_condition(&leaf.field, &leaf.operator, &format_scalar(value))
        }
        Operand::List(values) => {
            if values.is_empty() && is_set_membership(&leaf.operator) {
                return UNATTAINABLE_CONDITION.to_string();
            }
            let list = values
                .iter()
                .map(format_scalar)
                .collect::<Vec<_>>()
                .join(", ");
            compile_condition(&leaf.field, &leaf.operator, &format!("({})", list))
        }
    }
}
