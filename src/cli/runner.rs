//! CLI runner - executes the job

use crate::cli::commands::Cli;
use crate::config::{EtlConfig, DEFAULT_CONFIG_PATH};
use crate::error::{Result, ResultExt};
use crate::job::{EtlJob, JobReport};
use std::path::PathBuf;
use tracing::info;

/// CLI runner
pub struct Runner {
    config_path: PathBuf,
}

impl Runner {
    /// Create a new runner reading the default config file
    pub fn new(_cli: Cli) -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Read the config from somewhere else
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Load the config, run the job and print its summary to stdout
    pub async fn run(&self) -> Result<JobReport> {
        let config = EtlConfig::from_file(&self.config_path)?;
        info!(config = %self.config_path.display(), "Loaded configuration");

        let job = EtlJob::new(&config)?;
        let report = job.run().await?;

        let summary = serde_json::to_string_pretty(&report).context("rendering run summary")?;
        println!("{summary}");
        Ok(report)
    }
}
