//! Configuration file handling.
//!
//! Settings come from an optional `complaint_report.toml` in the working
//! directory. Every key has a default, so the file may be absent or partial.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "complaint_report.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Open-data endpoint returning a JSON array of complaint records.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum number of records to fetch.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Directory that receives charts and CSV exports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Enable debug logging.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            limit: default_limit(),
            timeout_seconds: default_timeout(),
            output_dir: default_output_dir(),
            verbose: false,
        }
    }
}

fn default_endpoint() -> String {
    "https://data.cityofnewyork.us/resource/erm2-nwe9.json".to_string()
}

fn default_limit() -> usize {
    1000
}

fn default_timeout() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            bail!("limit must be a positive integer");
        }
        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be a positive integer");
        }
        if self.endpoint.trim().is_empty() {
            bail!("endpoint must not be empty");
        }
        Ok(())
    }
}
