//! Aggregate every CSV file in a local directory into one table

use crate::decode::utf8_dropping_invalid;
use crate::{Error, Result, Table};
use s3os_file::local::list_files;
use s3os_file::telemetry::mem_check;
use s3os_file::Filter;
use std::path::Path;
use tracing::debug;

/// Filter used when the caller has no opinion: names containing `.csv`
pub fn default_filter() -> Filter {
    Filter::literal(".csv")
}

/// Read every matching file under `root` and concatenate the results
///
/// Files are decoded permissively: invalid UTF-8 sequences are dropped.
/// Matching directories are skipped. Fails with [`Error::EmptyAggregation`]
/// when nothing matched.
pub fn read_all_csv_in_directory(root: &Path, filter: Filter, recursive: bool) -> Result<Table> {
    let mut tables = Vec::new();

    for path in list_files(root, filter, recursive)? {
        let path = path?;
        if !path.is_file() {
            continue;
        }

        let bytes = std::fs::read(&path)?;
        let table = Table::from_csv_str(&utf8_dropping_invalid(&bytes))?;
        debug!("Read {} rows from: {}", table.len(), path.display());
        tables.push(table);
    }

    let file_count = tables.len();
    let table = Table::concat(tables).ok_or_else(|| Error::EmptyAggregation {
        location: root.display().to_string(),
    })?;

    mem_check(&format!(
        "Read {file_count} csv files in {} as one table",
        root.display()
    ));

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_and_concatenates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.csv"), "id,name\n1,Alice\n").unwrap();
        fs::write(root.join("b.csv"), "id,name\n2,Bob\n3,Carol\n").unwrap();
        fs::write(root.join("notes.txt"), "not,a,table\n").unwrap();

        let table = read_all_csv_in_directory(root, default_filter(), false).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("name").unwrap(), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("2019")).unwrap();
        fs::write(root.join("top.csv"), "v\n1\n").unwrap();
        fs::write(root.join("2019/nested.csv"), "v\n2\n").unwrap();

        let shallow = read_all_csv_in_directory(root, default_filter(), false).unwrap();
        assert_eq!(shallow.len(), 1);

        let deep = read_all_csv_in_directory(root, default_filter(), true).unwrap();
        assert_eq!(deep.column("v").unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_substring_filter_requires_every_part() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("sales_2019.csv"), "v\n1\n").unwrap();
        fs::write(root.join("SALES_2020.CSV"), "v\n2\n").unwrap();
        fs::write(root.join("costs_2019.csv"), "v\n3\n").unwrap();

        let filter = Filter::substrings(["sales", ".csv"]);
        let table = read_all_csv_in_directory(root, filter, false).unwrap();
        assert_eq!(table.column("v").unwrap(), vec!["2", "1"]);

        let filter = Filter::literal("sales 2019");
        let table = read_all_csv_in_directory(root, filter, false).unwrap();
        assert_eq!(table.column("v").unwrap(), vec!["1"]);
    }

    #[test]
    fn test_regex_filter() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("part_1.csv"), "v\n1\n").unwrap();
        fs::write(root.join("part_2.csv"), "v\n2\n").unwrap();
        fs::write(root.join("part_x.csv"), "v\nx\n").unwrap();
        fs::write(root.join("part_3.csv.bak"), "v\n3\n").unwrap();

        let filter = Filter::regex(r"^part_\d+\.csv$").unwrap();
        let table = read_all_csv_in_directory(root, filter, false).unwrap();
        assert_eq!(table.column("v").unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_invalid_bytes_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.csv"), b"name\nAl\xffice\n").unwrap();

        let table = read_all_csv_in_directory(temp_dir.path(), default_filter(), false).unwrap();
        assert_eq!(table.column("name").unwrap(), vec!["Alice"]);
    }

    #[test]
    fn test_no_matches_is_empty_aggregation() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("readme.md"), "# hi").unwrap();

        let err = read_all_csv_in_directory(temp_dir.path(), default_filter(), false).unwrap_err();
        assert!(matches!(err, Error::EmptyAggregation { .. }));
    }
}
