//! Run configuration for the `extract` binary.
//!
//! The defaults reproduce the numbers used for the published analysis
//! (95% intervals over 5000 resamples). A RON file can override them:
//!
//! ```text
//! (confidence: 0.99, iterations: 10000, seed: 7, on_malformed: abort)
//! ```
//!
//! The `on_malformed` policy decides what a log file that fails to parse
//! does to the rest of the batch: lenient runs skip it and keep going,
//! strict runs give up immediately. Both behaviors are selectable here or
//! with `--strict`.

use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path};

/// What to do with an input log that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Report the file and continue with the remaining sources.
    Skip,
    /// Abort the whole batch.
    Abort,
}

/// Everything the analysis run can be tuned with.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Confidence level for every reported interval.
    pub confidence: f64,
    /// Number of bootstrap resamples per statistic.
    pub iterations: usize,
    /// Seed for the resampling random source.
    pub seed: u64,
    /// Policy for input logs that fail to parse.
    pub on_malformed: MalformedPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            iterations: 5000,
            seed: 2020,
            on_malformed: MalformedPolicy::Skip,
        }
    }
}

/// Returned when a configuration file cannot be loaded.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading the file failed.
    IoError(std::io::Error),
    /// The file is not valid RON for an [`ExtractConfig`].
    RonSpannedError(ron::de::SpannedError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::IoError(error) => write!(f, "io error: {}", error),
            ConfigError::RonSpannedError(error) => write!(f, "ron error: {}", error),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ExtractConfig {
    /// Load a configuration from a RON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::IoError)?;
        ron::de::from_str(&text).map_err(ConfigError::RonSpannedError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_published_analysis() {
        let config = ExtractConfig::default();
        assert_eq!(config.confidence, 0.95);
        assert_eq!(config.iterations, 5000);
        assert_eq!(config.on_malformed, MalformedPolicy::Skip);
    }

    #[test]
    fn partial_file_overrides_only_what_it_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(confidence: 0.99, on_malformed: abort)").unwrap();

        let config = ExtractConfig::from_path(file.path()).unwrap();
        assert_eq!(config.confidence, 0.99);
        assert_eq!(config.on_malformed, MalformedPolicy::Abort);
        assert_eq!(config.iterations, 5000);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not ron at all").unwrap();
        assert!(ExtractConfig::from_path(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ExtractConfig::from_path("/no/such/config.ron").is_err());
    }
}
