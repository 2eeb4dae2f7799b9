//! TOML configuration file
//!
//! ```toml
//! [s3]
//! bucket = "my-bucket"
//! region = "us-west-2"
//! endpoint_url = "http://localhost:9000"
//! page_size = 1000
//!
//! [log]
//! level = "debug"
//! ```

use anyhow::Context;
use s3os_file::{Error, S3Config};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Bucket connection; only remote commands need it
    #[serde(default)]
    pub s3: Option<S3Config>,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(ref s3) = self.s3 {
            s3.validate()?;
        }
        if self.log.level.trim().is_empty() {
            return Err(Error::Configuration("log.level must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = Config::from_toml_str(
            r#"
            [s3]
            bucket = "my-bucket"
            region = "us-west-2"
            endpoint_url = "http://localhost:9000"
            page_size = 500

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        let s3 = config.s3.unwrap();
        assert_eq!(s3.bucket, "my-bucket");
        assert_eq!(s3.region.as_deref(), Some("us-west-2"));
        assert_eq!(s3.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(s3.page_size, 500);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("[s3]\nbucket = \"b\"\n").unwrap();
        assert_eq!(config.s3.unwrap().page_size, 1000);
        assert_eq!(config.log.level, "info");

        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_page_size() {
        let err = Config::from_toml_str("[s3]\nbucket = \"b\"\npage_size = 0\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_toml_str("[s3]\nbucket = \"b\"\nbukket = 1\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("s3os.toml");
        std::fs::write(&path, "[log]\nlevel = \"warn\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log.level, "warn");
        assert!(Config::from_file(&temp_dir.path().join("missing.toml")).is_err());
    }
}
