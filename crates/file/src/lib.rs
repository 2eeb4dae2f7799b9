//! `os`-style file operations over the local filesystem and S3 buckets
//!
//! The local side works on paths and the remote side on object keys; both
//! offer listing, existence, copy and rename under similar names.
//!
//! # Local
//!
//! - [`local::list_files`] lazily lists entries under a directory, optionally
//!   through every subdirectory, keeping base names that pass a [`Filter`]
//! - [`local::list_subdirectories`], [`local::basename`], [`local::dirname`]
//!
//! # Remote
//!
//! [`RemoteDir`] binds one bucket through an [`ObjectStore`]: [`S3Store`] for
//! S3 and S3-compatible services, [`MemoryStore`] for tests.
//!
//! # Example
//!
//! ```ignore
//! use s3os_file::{local, Filter, RemoteDir, S3Config};
//!
//! for path in local::list_files("data/".as_ref(), Filter::literal(".csv"), true)? {
//!     println!("{}", path?.display());
//! }
//!
//! let remote = RemoteDir::connect(&S3Config::new("my-bucket")).await?;
//! if let Some(size) = remote.exists("data/raw/", true).await? {
//!     println!("data/raw/ holds {size}");
//! }
//! ```

mod error;
pub mod filter;
pub mod local;
mod memory;
pub mod remote;
mod s3;
pub mod size;
pub mod store;
pub mod telemetry;

pub use error::{BoxError, Error, Result, StorageOperation};
pub use filter::{matches, Filter, FilterMode, Pattern};
pub use memory::MemoryStore;
pub use remote::RemoteDir;
pub use s3::{S3Config, S3Store};
pub use size::{SizeReport, SizeValue};
pub use store::{DeleteAck, ListPage, ListRequest, ObjectStore, ObjectSummary, DEFAULT_PAGE_SIZE};
