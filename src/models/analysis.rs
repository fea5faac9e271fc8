use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One parsed row of delimited input: field name → raw value, in source order.
///
/// A field that was missing from the row (short record) is simply absent;
/// empty strings are kept as-is and treated as null-ish by the inferencer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularRecord {
    fields: Vec<(String, String)>,
}

impl TabularRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Field names in the order they appeared in the source row.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(field, _)| field.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Coarse storage type assigned to a column by the inferencer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Numeric,
    Boolean,
    Date,
    Timestamp,
    Text,
}

impl ColumnType {
    /// SQL type name used in the generated CREATE TABLE suggestion.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Numeric => "NUMERIC",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Inferred type, nullability and consistency summary for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnType,
    /// Records in the sample where the field was absent, null or empty.
    pub nullable_count: usize,
    pub nullable: bool,
    /// True iff every non-null sampled value classifies to `inferred_type`.
    pub consistent: bool,
    /// First few raw values observed, for display only.
    pub sample_values: Vec<String>,
}

/// Result of analyzing one uploaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAnalysis {
    pub id: String,
    /// Rows in the full input, independent of the inference sample size.
    pub row_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub create_table_statement: String,
    pub analyzed_at: DateTime<Utc>,
}

impl TableAnalysis {
    pub fn new(
        row_count: usize,
        columns: Vec<ColumnProfile>,
        create_table_statement: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            row_count,
            columns,
            create_table_statement,
            analyzed_at: Utc::now(),
        }
    }
}

/// Request body for the CSV analyzer endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCsvRequest {
    /// Raw delimited text as uploaded.
    pub content: String,
    /// Table name used in the CREATE TABLE suggestion.
    #[serde(default)]
    pub table_name: Option<String>,
    /// Field delimiter, comma when omitted.
    #[serde(default)]
    pub delimiter: Option<char>,
}
