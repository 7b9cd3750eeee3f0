use crate::error::{Result, RoboversionError};
use crate::resolver::StreamBranches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name searched for in the repository and the user config directory
pub const CONFIG_FILE_NAME: &str = "roboversion.toml";

/// Represents the complete configuration for roboversion.
///
/// Contains the prerelease stream branches and behavior options. Every value
/// can be overridden on the command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub streams: StreamsConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Branch names of the prerelease streams.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct StreamsConfig {
    #[serde(default)]
    pub alpha: Option<String>,

    #[serde(default)]
    pub beta: Option<String>,

    /// The release candidate branch
    #[serde(default)]
    pub release: Option<String>,
}

impl StreamsConfig {
    pub fn to_stream_branches(&self) -> StreamBranches {
        StreamBranches {
            alpha: self.alpha.clone(),
            beta: self.beta.clone(),
            candidate: self.release.clone(),
        }
    }
}

fn default_auto_local() -> bool {
    true
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Append the abbreviated commit id to development versions
    #[serde(default = "default_auto_local")]
    pub auto_local: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            auto_local: default_auto_local(),
        }
    }
}

/// Parse configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| RoboversionError::config(e.to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `roboversion.toml` in the repository directory
/// 3. `roboversion.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repository_path` - The repository whose version is being resolved
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repository_path: &Path) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            RoboversionError::config(format!("Cannot read {}: {}", path.display(), e))
        })?
    } else if repository_path.join(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(repository_path.join(CONFIG_FILE_NAME))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.streams, StreamsConfig::default());
        assert!(config.behavior.auto_local);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [streams]
            alpha = "develop"
            beta = "beta"
            release = "release"

            [behavior]
            auto_local = false
            "#,
        )
        .unwrap();

        assert_eq!(config.streams.alpha.as_deref(), Some("develop"));
        assert_eq!(config.streams.beta.as_deref(), Some("beta"));
        assert_eq!(config.streams.release.as_deref(), Some("release"));
        assert!(!config.behavior.auto_local);

        let branches = config.streams.to_stream_branches();
        assert_eq!(branches.candidate.as_deref(), Some("release"));
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = parse_config("[streams]\nalpha = \"develop\"\n").unwrap();
        assert_eq!(config.streams.beta, None);
        assert!(config.behavior.auto_local);
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = parse_config("[streams\nalpha = 1").unwrap_err();
        assert!(matches!(err, RoboversionError::Config(_)));
    }
}
