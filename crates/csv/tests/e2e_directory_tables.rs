//! End-to-end tests moving CSV directories between the local filesystem and a bucket
//!
//! The bucket is a `MemoryStore`, so these run without credentials.

use s3os_csv::{default_filter, read_all_csv_in_directory, RemoteTables, Table};
use s3os_file::{MemoryStore, RemoteDir, SizeReport};
use std::fs;
use tempfile::TempDir;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Five rows spread over three numbered parts, one of them empty
fn write_parts(root: &std::path::Path) {
    fs::create_dir_all(root.join("2020")).unwrap();
    fs::write(root.join("patents_0.csv"), "id,title\n").unwrap();
    fs::write(root.join("patents_2.csv"), "id,title\n1,Lamp\n2,Wheel\n").unwrap();
    fs::write(
        root.join("2020/patents_3.csv"),
        "id,title\n3,Gear\n4,Lever\n5,Pulley\n",
    )
    .unwrap();
}

#[tokio::test]
async fn test_upload_then_aggregate_remotely() {
    init_logging();
    let local = TempDir::new().unwrap();
    write_parts(local.path());

    let remote = RemoteDir::new(MemoryStore::new("bucket"));
    let mut keys = remote
        .upload_directory(local.path(), "raw")
        .await
        .unwrap();
    keys.sort();
    assert_eq!(
        keys,
        vec!["raw/2020/patents_3.csv", "raw/patents_0.csv", "raw/patents_2.csv"]
    );

    let table = remote.read_all_csv_as_table("raw/").await.unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(table.columns(), ["id", "title"]);

    let size = remote.exists("raw/", false).await.unwrap();
    assert!(matches!(size, Some(SizeReport::Exact(_))));
}

#[tokio::test]
async fn test_download_then_aggregate_locally() {
    init_logging();
    let remote = RemoteDir::new(
        MemoryStore::new("bucket")
            .with_page_size(2)
            .with_object("exports/", "")
            .with_object("exports/a_1.csv", "k,v\na,1\n")
            .with_object("exports/nested/b_1.csv", "k,v\nb,2\n")
            .with_object("exports/nested/c_1.csv", "k,v\nc,3\n"),
    );

    let target = TempDir::new().unwrap();
    let written = remote
        .download_directory("exports/", target.path())
        .await
        .unwrap();
    assert_eq!(written.len(), 3);

    let table =
        read_all_csv_in_directory(&target.path().join("exports"), default_filter(), true).unwrap();
    let mut keys = table.column("k").unwrap();
    keys.sort();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_saved_table_reads_back() {
    init_logging();
    let remote = RemoteDir::new(MemoryStore::new("bucket"));
    let table = Table::from_csv_str("name,count\n\"Smith, J\",4\n").unwrap();

    remote.save_table(&table, "reports/summary_1.csv").await.unwrap();
    let loaded = remote.read_all_csv_as_table("reports/").await.unwrap();

    assert_eq!(loaded, table);
}

#[tokio::test]
async fn test_rename_moves_table() {
    init_logging();
    let remote = RemoteDir::new(MemoryStore::new("bucket"));
    let table = Table::from_csv_str("x\n1\n").unwrap();
    remote.save_table(&table, "tmp/part_1.csv").await.unwrap();

    remote
        .rename("tmp/part_1.csv", "final/part_1.csv")
        .await
        .unwrap();

    assert!(remote.exists("tmp/", false).await.unwrap().is_none());
    assert_eq!(remote.list("final/", None).await.unwrap(), vec!["final/part_1.csv"]);
}
