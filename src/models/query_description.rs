// Query Builder Description Model
//
// Structured, language-agnostic representation of a SELECT query's clauses
// as submitted by the visual query builder UI. The assembler renders this
// into SQL text; loosely-typed filter values are normalized here, at the
// model boundary, into a single `FilterValue` shape.

use serde::{Deserialize, Serialize};

/// A structured description of a SELECT query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescription {
    /// First entry is the FROM target; the rest must be referenced by joins.
    #[serde(default)]
    pub tables: Vec<String>,
    /// Empty means `SELECT *`.
    #[serde(default)]
    pub columns: Vec<ColumnRef>,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    /// Combined with AND only, in declaration order.
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub group_by: Vec<ColumnTarget>,
    #[serde(default)]
    pub order_by: Vec<OrderSpec>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub distinct: bool,
}

/// A selected column, optionally aliased or wrapped in an aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<String>,
}

/// A bare table-qualified column reference (GROUP BY targets).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnTarget {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum JoinKind {
    #[default]
    #[serde(rename = "INNER", alias = "inner")]
    Inner,
    #[serde(rename = "LEFT", alias = "left")]
    Left,
    #[serde(rename = "RIGHT", alias = "right")]
    Right,
    #[serde(rename = "FULL", alias = "full")]
    Full,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinSpec {
    #[serde(default)]
    pub join_type: JoinKind,
    pub right_table: String,
    pub left_table: String,
    pub left_column: String,
    pub right_column: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ASC")]
    Asc,
    #[serde(rename = "desc", alias = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    pub table: String,
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Supported WHERE operators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FilterOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "NOT LIKE")]
    NotLike,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "BETWEEN")]
    Between,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
}

impl FilterOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::NotEq => "!=",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::GtEq => ">=",
            FilterOp::LtEq => "<=",
            FilterOp::Like => "LIKE",
            FilterOp::NotLike => "NOT LIKE",
            FilterOp::In => "IN",
            FilterOp::NotIn => "NOT IN",
            FilterOp::Between => "BETWEEN",
            FilterOp::IsNull => "IS NULL",
            FilterOp::IsNotNull => "IS NOT NULL",
        }
    }
}

/// One WHERE predicate. `value` arrives in whatever shape the UI sent
/// (string, number, bool, array, or nothing at all) and is normalized via
/// [`FilterSpec::normalized_value`] before rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub table: String,
    pub column: String,
    pub operator: FilterOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Declared column type; numeric/boolean types render unquoted literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// Normalized filter value shape, decided once per filter by its operator.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Scalar(String),
    List(Vec<String>),
    Range(String, String),
    Absent,
}

impl FilterSpec {
    /// Collapse the loose JSON value into a [`FilterValue`] for the operator.
    ///
    /// IN/NOT IN accept either an array or a comma-separated string;
    /// BETWEEN accepts a "min,max" string or a two-element array;
    /// IS [NOT] NULL carry no value. Everything else is a scalar.
    pub fn normalized_value(&self) -> FilterValue {
        match self.operator {
            FilterOp::IsNull | FilterOp::IsNotNull => FilterValue::Absent,
            FilterOp::In | FilterOp::NotIn => FilterValue::List(self.value_elements()),
            FilterOp::Between => {
                let mut bounds = self.value_elements().into_iter();
                FilterValue::Range(
                    bounds.next().unwrap_or_default(),
                    bounds.next().unwrap_or_default(),
                )
            }
            _ => FilterValue::Scalar(
                self.value.as_ref().map(value_text).unwrap_or_default(),
            ),
        }
    }

    /// True when the declared data type means literals render unquoted.
    pub fn unquoted_literal(&self) -> bool {
        matches!(
            self.data_type.as_deref(),
            Some("number")
                | Some("integer")
                | Some("numeric")
                | Some("decimal")
                | Some("float")
                | Some("double")
                | Some("boolean")
        )
    }

    fn value_elements(&self) -> Vec<String> {
        match &self.value {
            Some(serde_json::Value::Array(items)) => items.iter().map(value_text).collect(),
            Some(other) => value_text(other)
                .split(',')
                .map(|part| part.trim().to_string())
                .collect(),
            None => Vec::new(),
        }
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
