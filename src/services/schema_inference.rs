// Schema Inference - column type detection for uploaded tabular samples
//
// Classifies each column of a bounded sample into a coarse storage type,
// reports nullability and type consistency, and renders a CREATE TABLE
// suggestion. The inferred type comes from the first non-null value in the
// sample; later values only affect the consistency flag.

use chrono::{NaiveDate, NaiveDateTime};

use crate::api::middleware::AppError;
use crate::models::{ColumnProfile, ColumnType, TableAnalysis, TabularRecord};

/// Identifier length limit matching common relational engines.
const IDENTIFIER_MAX_LEN: usize = 63;

const DEFAULT_SAMPLE_LIMIT: usize = 100;
const DEFAULT_SAMPLE_VALUES: usize = 5;

pub struct SchemaInference {
    sample_limit: usize,
    sample_value_limit: usize,
}

impl SchemaInference {
    pub fn new() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            sample_value_limit: DEFAULT_SAMPLE_VALUES,
        }
    }

    pub fn with_limits(sample_limit: usize, sample_value_limit: usize) -> Self {
        Self {
            sample_limit: sample_limit.max(1),
            sample_value_limit,
        }
    }

    /// Classify a single raw value, or `None` for blank/empty input.
    ///
    /// Precedence is fixed: boolean, then integer/numeric, then date, then
    /// timestamp, with text as the fallback. Every non-blank value classifies
    /// to something; this never fails.
    pub fn classify_value(value: &str) -> Option<ColumnType> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
            return Some(ColumnType::Boolean);
        }

        if let Ok(number) = trimmed.parse::<f64>() {
            if number.is_finite() {
                return Some(if number.fract() == 0.0 {
                    ColumnType::Integer
                } else {
                    ColumnType::Numeric
                });
            }
        }

        if is_date(trimmed) {
            return Some(ColumnType::Date);
        }

        if is_timestamp(trimmed) {
            return Some(ColumnType::Timestamp);
        }

        Some(ColumnType::Text)
    }

    /// Profile one column from its sampled values (absent fields are `None`).
    pub fn infer_column(&self, name: &str, values: &[Option<&str>]) -> ColumnProfile {
        let mut nullable_count = 0;
        let mut inferred: Option<ColumnType> = None;
        let mut consistent = true;
        let mut sample_values = Vec::new();

        for value in values {
            let raw = match value {
                Some(raw) if !raw.trim().is_empty() => *raw,
                _ => {
                    nullable_count += 1;
                    continue;
                }
            };

            if sample_values.len() < self.sample_value_limit {
                sample_values.push(raw.to_string());
            }

            // classify_value is Some for any non-blank input
            let classified = Self::classify_value(raw).unwrap_or(ColumnType::Text);
            match inferred {
                None => inferred = Some(classified),
                Some(first) if classified != first => consistent = false,
                Some(_) => {}
            }
        }

        ColumnProfile {
            name: name.to_string(),
            // All-null columns default to TEXT
            inferred_type: inferred.unwrap_or(ColumnType::Text),
            nullable_count,
            nullable: nullable_count > 0,
            consistent,
            sample_values,
        }
    }

    /// Analyze a parsed table: profile every column seen in the sample and
    /// render a CREATE TABLE suggestion.
    ///
    /// Columns are the union of field names across the sampled records, in
    /// first-seen order. The row count reflects the full input even though
    /// inference only reads the first `sample_limit` records.
    pub fn analyze_table(
        &self,
        table_name: &str,
        records: &[TabularRecord],
    ) -> Result<TableAnalysis, AppError> {
        if records.is_empty() {
            return Err(AppError::EmptyInput("CSV file is empty".to_string()));
        }

        let sample = &records[..records.len().min(self.sample_limit)];

        let mut names: Vec<String> = Vec::new();
        for record in sample {
            for field in record.field_names() {
                if !names.iter().any(|name| name == field) {
                    names.push(field.to_string());
                }
            }
        }

        let columns: Vec<ColumnProfile> = names
            .iter()
            .map(|name| {
                let values: Vec<Option<&str>> =
                    sample.iter().map(|record| record.get(name)).collect();
                self.infer_column(name, &values)
            })
            .collect();

        let statement = render_create_table(table_name, &columns);

        Ok(TableAnalysis::new(records.len(), columns, statement))
    }
}

impl Default for SchemaInference {
    fn default() -> Self {
        Self::new()
    }
}

fn is_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Matches a `YYYY-MM-DD[T ]HH:MM:SS` prefix; trailing fraction/zone ignored.
fn is_timestamp(value: &str) -> bool {
    let prefix = match value.get(..19) {
        Some(prefix) => prefix,
        None => return false,
    };
    let separator = prefix.as_bytes()[10];
    if separator != b'T' && separator != b' ' {
        return false;
    }
    let normalized = format!("{} {}", &prefix[..10], &prefix[11..]);
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S").is_ok()
}

fn render_create_table(table_name: &str, columns: &[ColumnProfile]) -> String {
    let body: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            format!(
                "  \"{}\" {}",
                sanitize_identifier(&column.name, idx),
                column.inferred_type.as_sql()
            )
        })
        .collect();

    format!(
        "CREATE TABLE \"{}\" (\n{}\n);",
        sanitize_identifier(table_name, 0),
        body.join(",\n")
    )
}

/// Lower-case, map everything outside `[a-z0-9_]` to `_`, cap the length;
/// unnamed columns get a positional placeholder.
fn sanitize_identifier(name: &str, index: usize) -> String {
    let cleaned: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(IDENTIFIER_MAX_LEN)
        .collect();

    if cleaned.is_empty() {
        format!("column_{}", index + 1)
    } else {
        cleaned
    }
}
