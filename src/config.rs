//! Job configuration
//!
//! The job is configured once at startup from a YAML file and the resulting
//! [`EtlConfig`] is passed by value into the job. Nothing here touches the
//! process environment.

use crate::calendar::Clock;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file read by the binary, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/etl.yaml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete job configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Object-storage credentials (falls back to the standard AWS env vars)
    #[serde(default)]
    pub aws: Option<AwsCredentials>,

    /// Source locations
    #[serde(default)]
    pub input: InputConfig,

    /// Output location and write settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Wall clock used for timestamp decomposition
    #[serde(default)]
    pub clock: Clock,
}

impl EtlConfig {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(aws) = &self.aws {
            aws.validate()?;
        }
        self.input.validate()?;
        self.output.validate()
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Access key pair for S3-compatible object storage
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsCredentials {
    pub access_key_id: String,

    pub secret_access_key: String,

    #[serde(default)]
    pub session_token: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl AwsCredentials {
    fn validate(&self) -> Result<()> {
        if self.access_key_id.trim().is_empty() {
            return Err(Error::missing_field("aws.access_key_id"));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(Error::missing_field("aws.secret_access_key"));
        }
        Ok(())
    }
}

// Keeps secrets out of logs.
impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// ============================================================================
// Input
// ============================================================================

/// Where the raw JSON corpora live and how they are read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Glob over the song metadata corpus
    #[serde(default = "default_song_data")]
    pub song_data: String,

    /// Glob over the event log corpus
    #[serde(default = "default_log_data")]
    pub log_data: String,

    /// Upper bound on bytes packed into one input partition
    #[serde(default = "default_max_partition_bytes")]
    pub max_partition_bytes: u64,

    /// Objects fetched concurrently
    #[serde(default = "default_read_concurrency")]
    pub read_concurrency: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            song_data: default_song_data(),
            log_data: default_log_data(),
            max_partition_bytes: default_max_partition_bytes(),
            read_concurrency: default_read_concurrency(),
        }
    }
}

impl InputConfig {
    fn validate(&self) -> Result<()> {
        if self.song_data.trim().is_empty() {
            return Err(Error::missing_field("input.song_data"));
        }
        if self.log_data.trim().is_empty() {
            return Err(Error::missing_field("input.log_data"));
        }
        if self.max_partition_bytes == 0 {
            return Err(Error::invalid_value(
                "input.max_partition_bytes",
                "must be greater than zero",
            ));
        }
        if self.read_concurrency == 0 {
            return Err(Error::invalid_value(
                "input.read_concurrency",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_song_data() -> String {
    "s3a://udacity-dend/song_data/*/*/*/*.json".to_string()
}

fn default_log_data() -> String {
    "s3a://udacity-dend/log_data/*/*/*.json".to_string()
}

fn default_max_partition_bytes() -> u64 {
    128 * 1024 * 1024
}

fn default_read_concurrency() -> usize {
    16
}

// ============================================================================
// Output
// ============================================================================

/// Where the five tables are written and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base location; each table becomes a directory beneath it
    #[serde(default = "default_output_location")]
    pub location: String,

    #[serde(default)]
    pub mode: SaveMode,

    #[serde(default)]
    pub compression: CompressionCodec,

    /// Rows per part file before a partition group is split
    #[serde(default = "default_max_rows_per_file")]
    pub max_rows_per_file: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            location: default_output_location(),
            mode: SaveMode::default(),
            compression: CompressionCodec::default(),
            max_rows_per_file: default_max_rows_per_file(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(Error::missing_field("output.location"));
        }
        if self.max_rows_per_file == 0 {
            return Err(Error::invalid_value(
                "output.max_rows_per_file",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_output_location() -> String {
    ".".to_string()
}

fn default_max_rows_per_file() -> usize {
    1024 * 1024
}

/// Behavior when a table path already holds data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Abort the run
    #[default]
    ErrorIfExists,
    /// Delete what is there, then write
    Overwrite,
}

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionCodec {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

impl CompressionCodec {
    /// Infix used in part file names (`part-00000.snappy.parquet`)
    pub fn file_infix(self) -> Option<&'static str> {
        match self {
            Self::Snappy => Some("snappy"),
            Self::Zstd => Some("zstd"),
            Self::Gzip => Some("gz"),
            Self::None => None,
        }
    }
}
