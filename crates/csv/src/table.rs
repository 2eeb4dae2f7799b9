//! A minimal string-celled table read from and written to CSV

use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// Rows of string cells under a header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from unique column names and rows of matching width
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(name) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(Error::DuplicateColumn { name: name.clone() });
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::RaggedRow {
                    row: i + 1,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Parse comma-delimited data whose first record is the header
    ///
    /// Rows shorter than the header are padded with empty cells; longer rows
    /// are an error. A repeated header name gets a `.1`, `.2`, ... suffix so
    /// every column stays addressable.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .flexible(true)
            .from_reader(reader);

        let columns = unique_columns(csv_reader.headers()?.iter());

        let mut rows = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(Error::RaggedRow {
                    row: i + 1,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            let mut row: Vec<String> = record.iter().map(|v| v.to_string()).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn from_csv_str(data: &str) -> Result<Self> {
        Self::from_reader(data.as_bytes())
    }

    /// Header row followed by every data row
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }

    /// Stack tables row-wise
    ///
    /// Columns are the union of all headers in first-seen order; a table
    /// lacking a column contributes empty cells. An empty input has nothing to
    /// concatenate and yields `None`.
    pub fn concat(tables: Vec<Table>) -> Option<Table> {
        if tables.is_empty() {
            return None;
        }

        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for table in &tables {
            for column in &table.columns {
                if !positions.contains_key(column) {
                    positions.insert(column.clone(), columns.len());
                    columns.push(column.clone());
                }
            }
        }

        let total_rows = tables.iter().map(Table::len).sum();
        let mut rows = Vec::with_capacity(total_rows);
        for table in tables {
            let targets: Vec<usize> = table.columns.iter().map(|c| positions[c]).collect();
            for row in table.rows {
                let mut out = vec![String::new(); columns.len()];
                for (cell, &target) in row.into_iter().zip(&targets) {
                    out[target] = cell;
                }
                rows.push(out);
            }
        }

        Some(Table { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

fn unique_columns<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();
    for header in headers {
        let mut name = header.to_string();
        let mut suffix = 0;
        while seen.contains(&name) {
            suffix += 1;
            name = format!("{header}.{suffix}");
        }
        seen.insert(name.clone());
        columns.push(name);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let table = Table::from_csv_str("id,name\n1,Alice\n2,Bob\n").unwrap();
        assert_eq!(table.columns(), ["id", "name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("name").unwrap(), vec!["Alice", "Bob"]);
        assert_eq!(table.column("missing"), None);
    }

    #[test]
    fn test_short_rows_padded() {
        let table = Table::from_csv_str("a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows()[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_long_rows_rejected() {
        let err = Table::from_csv_str("a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_header_only() {
        let table = Table::from_csv_str("a,b\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_to_csv_quotes_fields() {
        let table = Table::new(
            vec!["name".into(), "note".into()],
            vec![vec!["Alice".into(), "likes, commas".into()]],
        )
        .unwrap();
        let bytes = table.to_csv_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,note\nAlice,\"likes, commas\"\n"
        );
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        assert!(Table::new(vec!["a".into()], vec![vec![]]).is_err());
    }

    #[test]
    fn test_concat_unions_columns() {
        let first = Table::from_csv_str("id,name\n1,Alice\n").unwrap();
        let second = Table::from_csv_str("name,age\nBob,25\n").unwrap();

        let combined = Table::concat(vec![first, second]).unwrap();
        assert_eq!(combined.columns(), ["id", "name", "age"]);
        assert_eq!(
            combined.rows(),
            [
                vec!["1".to_string(), "Alice".into(), "".into()],
                vec!["".to_string(), "Bob".into(), "25".into()],
            ]
        );
    }

    #[test]
    fn test_duplicate_headers_renamed() {
        let table = Table::from_csv_str("a,a,b,a\n1,2,3,4\n").unwrap();
        assert_eq!(table.columns(), ["a", "a.1", "b", "a.2"]);

        let combined = Table::concat(vec![table]).unwrap();
        assert_eq!(combined.rows(), [vec!["1", "2", "3", "4"]]);
    }

    #[test]
    fn test_duplicate_headers_avoid_existing_names() {
        let table = Table::from_csv_str("a,a.1,a\n1,2,3\n").unwrap();
        assert_eq!(table.columns(), ["a", "a.1", "a.2"]);
    }

    #[test]
    fn test_new_rejects_duplicate_columns() {
        let err = Table::new(vec!["a".into(), "a".into()], vec![]).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn { name } if name == "a"));
    }

    #[test]
    fn test_concat_empty_input() {
        assert_eq!(Table::concat(Vec::new()), None);
    }
}
