//! Filter tree types
//!
//! A raw JSON `where` object mixes implicit equality (`{"name": "Sean"}`)
//! with explicit operators (`{"age": {">=": 20}}`) and boolean groups
//! (`{"or": [...]}`). [`BooleanGroup::from_values`] resolves that shape once
//! into a [`FilterNode`] tree where every leaf carries its field and operator.

use serde_json::{Map, Value};

use crate::sql::operator::{OPERATOR_EQUAL, is_operator};

/// Boolean combinator of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// Parse an `and`/`or` key in any casing
    pub fn from_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if key.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    /// SQL keyword for this combinator
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

/// A single `field <operator> value` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionLeaf {
    pub field: String,
    /// Operator token as written; resolved against the operator table when compiled
    pub operator: String,
    pub value: Operand,
}

impl ConditionLeaf {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Operand) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// The conditions of one JSON object, in key order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldObject {
    pub entries: Vec<FilterNode>,
}

/// `AND`/`OR` over an ordered list of children
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanGroup {
    pub combinator: Combinator,
    pub children: Vec<FilterNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Condition(ConditionLeaf),
    Fields(FieldObject),
    Group(BooleanGroup),
    /// Pre-formatted SQL used verbatim
    Raw(String),
}

impl BooleanGroup {
    /// Normalize a JSON list into a group
    ///
    /// Objects become field objects and nested lists become `AND` groups.
    /// Scalars in the list are ignored.
    pub fn from_values(combinator: Combinator, values: &[Value]) -> Self {
        let children = values
            .iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(FilterNode::Fields(FieldObject::from_map(map, None))),
                Value::Array(items) => Some(FilterNode::Group(BooleanGroup::from_values(
                    Combinator::And,
                    items,
                ))),
                _ => None,
            })
            .collect();

        Self {
            combinator,
            children,
        }
    }
}

impl FieldObject {
    /// Normalize one JSON object
    ///
    /// `field` is `None` when the object sits directly in a group, where every
    /// key names a field. Under a field name, keys are operator tokens; a
    /// scalar under a key that is not an operator is treated as a new field
    /// with implicit equality.
    pub fn from_map(map: &Map<String, Value>, field: Option<&str>) -> Self {
        let mut entries = Vec::with_capacity(map.len());

        for (key, value) in map {
            let entry = match value {
                Value::Object(inner) => {
                    let next = if key == OPERATOR_EQUAL { field } else { Some(key.as_str()) };
                    FilterNode::Fields(FieldObject::from_map(inner, next))
                }
                Value::Array(items) => {
                    if let Some(combinator) = Combinator::from_key(key) {
                        FilterNode::Group(BooleanGroup::from_values(combinator, items))
                    } else if let Some(field) = field {
                        FilterNode::Condition(ConditionLeaf::new(
                            field,
                            key.as_str(),
                            Operand::List(items.clone()),
                        ))
                    } else {
                        implicit(key, "in", Operand::List(items.clone()))
                    }
                }
                scalar => match field {
                    Some(field) if is_operator(key) => FilterNode::Condition(ConditionLeaf::new(
                        field,
                        key.as_str(),
                        Operand::Scalar(scalar.clone()),
                    )),
                    _ => implicit(key, OPERATOR_EQUAL, Operand::Scalar(scalar.clone())),
                },
            };
            entries.push(entry);
        }

        Self { entries }
    }
}

// Shorthand `{key: value}` expands to `{key: {operator: value}}`.
fn implicit(key: &str, operator: &str, value: Operand) -> FilterNode {
    FilterNode::Fields(FieldObject {
        entries: vec![FilterNode::Condition(ConditionLeaf::new(key, operator, value))],
    })
}
