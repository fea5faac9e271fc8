use std::io::Read;
use std::path::Path;

use crate::api::middleware::AppError;
use crate::models::TabularRecord;

/// Delimited-text parser feeding the schema inferencer.
///
/// Runs the `csv` crate in flexible mode so rows with too few or too many
/// fields still parse: short rows simply lack the trailing fields, surplus
/// fields get generated `column_<n>` names.
pub struct CsvReader {
    delimiter: u8,
}

impl CsvReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Parse raw delimited text into ordered field → value records.
    pub fn read_str(&self, data: &str) -> Result<Vec<TabularRecord>, AppError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(data.as_bytes());
        self.collect_records(reader)
    }

    /// Parse a delimited file from disk.
    pub fn read_path(&self, path: &Path) -> Result<Vec<TabularRecord>, AppError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_path(path)?;
        self.collect_records(reader)
    }

    fn collect_records<R: Read>(
        &self,
        mut reader: csv::Reader<R>,
    ) -> Result<Vec<TabularRecord>, AppError> {
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut fields = Vec::with_capacity(row.len());
            for (idx, value) in row.iter().enumerate() {
                let name = headers
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{}", idx + 1));
                fields.push((name, value.to_string()));
            }
            records.push(TabularRecord::new(fields));
        }

        Ok(records)
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_basic_csv() {
        let records = CsvReader::new()
            .read_str("name,age\nalice,30\nbob,31\n")
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some("alice"));
        assert_eq!(records[1].get("age"), Some("31"));
    }

    #[test]
    fn test_short_rows_leave_fields_absent() {
        let records = CsvReader::new().read_str("a,b,c\n1,2\n").unwrap();

        assert_eq!(records[0].get("a"), Some("1"));
        assert_eq!(records[0].get("b"), Some("2"));
        assert_eq!(records[0].get("c"), None);
    }

    #[test]
    fn test_surplus_fields_get_generated_names() {
        let records = CsvReader::new().read_str("a\n1,2,3\n").unwrap();

        assert_eq!(records[0].get("a"), Some("1"));
        assert_eq!(records[0].get("column_2"), Some("2"));
        assert_eq!(records[0].get("column_3"), Some("3"));
    }

    #[test]
    fn test_custom_delimiter() {
        let records = CsvReader::with_delimiter(b';')
            .read_str("a;b\n1;2\n")
            .unwrap();

        assert_eq!(records[0].get("b"), Some("2"));
    }

    #[test]
    fn test_header_only_input_yields_no_records() {
        let records = CsvReader::new().read_str("a,b\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,label").unwrap();
        writeln!(file, "1,first").unwrap();

        let records = CsvReader::new().read_path(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("label"), Some("first"));
    }
}
