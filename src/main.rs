//! Command-line interface for s3os
//!
//! # Usage Examples
//!
//! ```bash
//! # List keys under a prefix that contain a substring
//! s3os --bucket my-bucket ls data/raw/ --contains .csv
//!
//! # Size of everything under a prefix
//! s3os --bucket my-bucket exists data/raw/ --human
//!
//! # Move an object
//! s3os --bucket my-bucket mv data/tmp.csv data/final.csv
//!
//! # Round-trip a directory
//! s3os --bucket my-bucket upload ./project/data data/raw
//! s3os --bucket my-bucket download data/raw/ ./mirror
//!
//! # Local listing and CSV aggregation
//! s3os local-ls ./project --filter report .pdf --recursive
//! s3os local-csv ./project/data --recursive > all.csv
//! ```
//!
//! Connection settings can come from a TOML file (`--config`, see
//! `s3os::config`) and are overridden by flags and `S3OS_*` variables.

use anyhow::Context;
use clap::{Parser, Subcommand};
use s3os::csv::{read_all_csv_in_directory, RemoteTables};
use s3os::file::{local, ObjectStore, RemoteDir};
use s3os::{Config, FilterOpts, S3Opts};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "s3os")]
#[command(about = "os-style file operations for local directories and S3 buckets")]
#[command(long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "S3OS_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    s3_opts: S3Opts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List local entries matching a filter
    LocalLs {
        dir: PathBuf,

        #[command(flatten)]
        filter_opts: FilterOpts,
    },

    /// Concatenate local CSV files and print them
    LocalCsv {
        dir: PathBuf,

        #[command(flatten)]
        filter_opts: FilterOpts,
    },

    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Commands that need a bucket
#[derive(Subcommand)]
enum RemoteCommand {
    /// List keys under a prefix
    Ls {
        prefix: String,

        /// Keep only keys containing this literal, case-sensitive substring
        #[arg(long)]
        contains: Option<String>,
    },

    /// Report the total size of objects under a prefix
    Exists {
        prefix: String,

        /// Print kB/MB/GB instead of bytes
        #[arg(long)]
        human: bool,
    },

    /// Copy an object within the bucket
    Cp { source: String, dest: String },

    /// Rename an object (copy, then delete the source)
    Mv { source: String, dest: String },

    /// Delete an object
    Rm { key: String },

    /// Create an empty object unless the key already exists
    Touch { key: String },

    /// Mirror a prefix into a local directory
    Download { prefix: String, local_dir: PathBuf },

    /// Upload a local directory under a prefix
    Upload { local_dir: PathBuf, prefix: String },

    /// Concatenate the numbered CSV files under a prefix and print them
    CatCsv { prefix: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };
    s3os::logging::init(&config.log.level)?;

    match cli.command {
        Commands::LocalLs { dir, filter_opts } => {
            let filter = filter_opts.build()?;
            let mut stdout = std::io::stdout().lock();
            for path in local::list_files(&dir, filter, filter_opts.recursive)? {
                let path = path.with_context(|| format!("Failed to list {}", dir.display()))?;
                writeln!(stdout, "{}", path.display())?;
            }
        }
        Commands::LocalCsv { dir, filter_opts } => {
            let filter = if filter_opts.filter.is_empty() {
                s3os::csv::default_filter()
            } else {
                filter_opts.build()?
            };
            let table = read_all_csv_in_directory(&dir, filter, filter_opts.recursive)?;
            std::io::stdout().write_all(&table.to_csv_bytes()?)?;
        }
        Commands::Remote(command) => {
            let s3_config = cli.s3_opts.resolve(config.s3.as_ref())?;
            let remote = RemoteDir::connect(&s3_config)
                .await
                .with_context(|| format!("Failed to connect to bucket {}", s3_config.bucket))?;
            tracing::debug!("Using bucket: {}", remote.bucket());
            return run_remote(&remote, command).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run one bucket command; `exists` on an absent prefix exits with 1
async fn run_remote<S: ObjectStore>(
    remote: &RemoteDir<S>,
    command: RemoteCommand,
) -> anyhow::Result<ExitCode> {
    let mut stdout = std::io::stdout().lock();

    match command {
        RemoteCommand::Ls { prefix, contains } => {
            for key in remote.list(&prefix, contains.as_deref()).await? {
                writeln!(stdout, "{key}")?;
            }
        }
        RemoteCommand::Exists { prefix, human } => match remote.exists(&prefix, human).await? {
            Some(size) => writeln!(stdout, "{size}")?,
            None => {
                writeln!(stdout, "not found")?;
                return Ok(ExitCode::FAILURE);
            }
        },
        RemoteCommand::Cp { source, dest } => remote.copy(&source, &dest).await?,
        RemoteCommand::Mv { source, dest } => remote.rename(&source, &dest).await?,
        RemoteCommand::Rm { key } => {
            remote.remove(&key).await?;
        }
        RemoteCommand::Touch { key } => {
            let created = remote.create_if_not_exists(&key).await?;
            writeln!(stdout, "{}", if created { "created" } else { "exists" })?;
        }
        RemoteCommand::Download { prefix, local_dir } => {
            let written = remote.download_directory(&prefix, &local_dir).await?;
            writeln!(stdout, "downloaded {} files", written.len())?;
        }
        RemoteCommand::Upload { local_dir, prefix } => {
            let keys = remote.upload_directory(&local_dir, &prefix).await?;
            writeln!(stdout, "uploaded {} files", keys.len())?;
        }
        RemoteCommand::CatCsv { prefix } => {
            let table = remote.read_all_csv_as_table(&prefix).await?;
            stdout.write_all(&table.to_csv_bytes()?)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3os::file::MemoryStore;

    fn same(a: ExitCode, b: ExitCode) -> bool {
        format!("{a:?}") == format!("{b:?}")
    }

    #[tokio::test]
    async fn test_exists_exit_codes() {
        let remote = RemoteDir::new(MemoryStore::new("bucket").with_object("data/a.csv", "1"));

        let command = RemoteCommand::Exists {
            prefix: "data/".into(),
            human: false,
        };
        let code = run_remote(&remote, command).await.unwrap();
        assert!(same(code, ExitCode::SUCCESS));

        let command = RemoteCommand::Exists {
            prefix: "missing/".into(),
            human: false,
        };
        let code = run_remote(&remote, command).await.unwrap();
        assert!(same(code, ExitCode::FAILURE));
    }
}
