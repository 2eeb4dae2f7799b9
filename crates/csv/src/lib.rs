//! CSV tables over local directories and S3 prefixes
//!
//! - [`read_all_csv_in_directory`] concatenates the CSV files found by a local
//!   listing
//! - [`RemoteTables`] adds `save_table` and `read_all_csv_as_table` to
//!   [`s3os_file::RemoteDir`]

pub mod decode;
mod error;
pub mod local;
pub mod remote;
mod table;

pub use error::{Error, Result};
pub use local::{default_filter, read_all_csv_in_directory};
pub use remote::RemoteTables;
pub use table::Table;

// Re-export directory types for convenience
pub use s3os_file::{Filter, FilterMode, Pattern, RemoteDir};
