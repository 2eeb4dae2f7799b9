//! Tables stored in and loaded from an S3 prefix

use crate::{Error, Result, Table};
use async_trait::async_trait;
use bytes::Bytes;
use s3os_file::telemetry::mem_check;
use s3os_file::{ObjectStore, RemoteDir};
use tracing::debug;

/// Report memory every this many listed keys while aggregating
const PROGRESS_INTERVAL: usize = 50;

#[async_trait]
pub trait RemoteTables {
    /// Serialize `table` to CSV in memory and upload it as the body of `key`
    async fn save_table(&self, table: &Table, key: &str) -> Result<()>;

    /// Concatenate the numbered CSV files under `prefix`
    ///
    /// Only keys ending in `.csv` whose file name contains a digit run are
    /// loaded, and a name whose first digit run is zero (`data_0.csv`) is
    /// taken to hold no rows and skipped. Fails with
    /// [`Error::EmptyAggregation`] when nothing was loaded.
    async fn read_all_csv_as_table(&self, prefix: &str) -> Result<Table>;
}

#[async_trait]
impl<S: ObjectStore> RemoteTables for RemoteDir<S> {
    async fn save_table(&self, table: &Table, key: &str) -> Result<()> {
        let body = table.to_csv_bytes()?;
        self.put(key, Bytes::from(body)).await?;
        debug!(
            "Saved {} rows to {}",
            table.len(),
            self.store().display_name(key)
        );
        Ok(())
    }

    async fn read_all_csv_as_table(&self, prefix: &str) -> Result<Table> {
        let keys = self.list(prefix, None).await?;
        let key_count = keys.len();
        let mut tables = Vec::new();

        for (idx, key) in keys.iter().enumerate() {
            if idx % PROGRESS_INTERVAL == 0 {
                mem_check(&format!("Read {idx}/{key_count}"));
            }

            if !is_counted_csv(key) {
                continue;
            }

            let body = self.store().get_object(key).await?;
            let text = std::str::from_utf8(&body).map_err(|source| Error::Decode {
                location: self.store().display_name(key),
                source,
            })?;
            tables.push(Table::from_csv_str(text)?);
        }

        let table = Table::concat(tables).ok_or_else(|| Error::EmptyAggregation {
            location: self.store().display_name(prefix),
        })?;

        mem_check("Read all csv files in directory as one table");
        Ok(table)
    }
}

/// Whether `key` names a CSV file with a non-zero count in its name
pub fn is_counted_csv(key: &str) -> bool {
    if !key.ends_with(".csv") {
        return false;
    }

    let name = key.rsplit('/').next().unwrap_or(key);
    match first_digit_run(name) {
        Some(digits) => digits.bytes().any(|b| b != b'0'),
        None => false,
    }
}

fn first_digit_run(name: &str) -> Option<&str> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let rest = &name[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
