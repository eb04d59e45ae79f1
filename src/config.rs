//! Optional YAML configuration.
//!
//! A config file lets a run be repeated without retyping paths. Every key is
//! optional; command-line flags take precedence over anything set here.
//!
//! ```yaml
//! normalize_dates: true
//! protests:
//!   input: data/analyses.jsonl
//!   output: out/protests.jsonl
//! daily:
//!   input: data/daily_input.jsonl
//!   output: out/daily.jsonl
//! tally:
//!   input: data/analyses.jsonl
//!   output: out/issue_days.jsonl
//! ```

use crate::error::{AggregateError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Top-level configuration file. Unknown keys are rejected so a typo does
/// not silently fall back to a default.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DigestConfig {
    #[serde(default)]
    pub normalize_dates: bool,
    #[serde(default)]
    pub protests: PassPaths,
    #[serde(default)]
    pub daily: PassPaths,
    #[serde(default)]
    pub tally: PassPaths,
}

/// Input and output locations for one pass.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PassPaths {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl DigestConfig {
    /// Parse configuration text.
    ///
    /// # Arguments
    ///
    /// * `path` - Where the text came from; only used in error messages
    /// * `yaml` - The file contents
    ///
    /// # Returns
    ///
    /// The parsed configuration. Empty or whitespace-only text yields
    /// [`DigestConfig::default`].
    ///
    /// # Errors
    ///
    /// [`AggregateError::Config`] on invalid YAML or an unknown key.
    pub fn from_yaml(path: &Path, yaml: &str) -> Result<Self> {
        // An empty file deserializes to `()`, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| AggregateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// [`AggregateError::Config`] if the file cannot be read or parsed.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| AggregateError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let config = Self::from_yaml(path, &yaml)?;
        info!(normalize_dates = config.normalize_dates, "Loaded configuration");
        Ok(config)
    }
}

impl PassPaths {
    /// Fill in anything not given on the command line from `fallback`.
    pub fn or(self, fallback: &PassPaths) -> PassPaths {
        PassPaths {
            input: self.input.or_else(|| fallback.input.clone()),
            output: self.output.or_else(|| fallback.output.clone()),
        }
    }

    /// Require both paths.
    ///
    /// # Returns
    ///
    /// `(input, output)` once both are known.
    ///
    /// # Errors
    ///
    /// [`AggregateError::MissingPath`] naming the first path that is unset,
    /// checking `input` before `output`.
    pub fn resolve(self) -> Result<(PathBuf, PathBuf)> {
        let input = self.input.ok_or(AggregateError::MissingPath("input"))?;
        let output = self.output.ok_or(AggregateError::MissingPath("output"))?;
        Ok((input, output))
    }
}
