//! s3os library
//!
//! `os`-module style helpers for local directories and S3 buckets.
//!
//! - [`file`]: listing, filtering, copy/rename/remove, existence and size
//!   checks, directory upload/download
//! - [`csv`]: tables aggregated from CSV files in a directory or prefix
//!
//! # CLI Usage
//!
//! ```bash
//! # Total size of a prefix
//! s3os --bucket my-bucket exists data/raw/ --human
//!
//! # Mirror a prefix locally
//! s3os --bucket my-bucket download data/raw/ ./raw
//!
//! # Concatenate local CSV files below a directory
//! s3os local-csv ./raw --recursive
//! ```

use clap::Parser;
use s3os_file::{Filter, FilterMode, Pattern, S3Config};

pub mod config;
pub mod logging;

// Re-export the file and CSV crates for convenience
pub use s3os_csv as csv;
pub use s3os_file as file;

pub use config::Config;

#[derive(Parser, Clone, Debug, Default)]
pub struct S3Opts {
    /// Bucket to operate on
    #[arg(long, env = "S3OS_BUCKET")]
    pub bucket: Option<String>,

    /// AWS region override
    #[arg(long, env = "S3OS_REGION")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[arg(long, env = "S3OS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Page cap assumed by existence checks
    #[arg(long, env = "S3OS_PAGE_SIZE")]
    pub page_size: Option<i32>,
}

impl S3Opts {
    /// Merge flags over the `[s3]` section of the config file
    pub fn resolve(&self, file: Option<&S3Config>) -> Result<S3Config, s3os_file::Error> {
        let mut config = match (&self.bucket, file) {
            (Some(bucket), Some(file)) => S3Config {
                bucket: bucket.clone(),
                ..file.clone()
            },
            (Some(bucket), None) => S3Config::new(bucket.clone()),
            (None, Some(file)) => file.clone(),
            (None, None) => {
                return Err(s3os_file::Error::Configuration(
                    "no bucket given; pass --bucket or set [s3] bucket in the config file".into(),
                ))
            }
        };

        if let Some(ref region) = self.region {
            config.region = Some(region.clone());
        }
        if let Some(ref endpoint_url) = self.endpoint_url {
            config.endpoint_url = Some(endpoint_url.clone());
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Clone, Debug, Default)]
pub struct FilterOpts {
    /// Substrings that must all appear in the file name, or one regex with --regex
    #[arg(long = "filter", value_name = "PATTERN", num_args = 1..)]
    pub filter: Vec<String>,

    /// Treat the filter as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Descend into subdirectories
    #[arg(long, short)]
    pub recursive: bool,
}

impl FilterOpts {
    pub fn pattern(&self) -> Option<Pattern> {
        match self.filter.as_slice() {
            [] => None,
            [single] => Some(Pattern::Single(single.clone())),
            many => Some(Pattern::Many(many.to_vec())),
        }
    }

    pub fn build(&self) -> Result<Filter, s3os_file::Error> {
        let mode = if self.regex {
            FilterMode::Regex
        } else {
            FilterMode::Literal
        };
        Filter::new(self.pattern(), mode)
    }
}
