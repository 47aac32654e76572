//! Executor configuration via `rexec.toml`
//!
//! Both settings have defaults that match the backend contract, so the file
//! is optional. A default file with comments can be written next to the
//! service's other configuration with [`ExecutorConfig::write_default_if_missing`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use rexec_core::{TRANSFER_BUFFER_BYTES, WORKSPACE_FILE};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "rexec.toml";

/// Errors raised while loading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// The config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Executor configuration loaded from `rexec.toml`.
///
/// # Example
///
/// ```toml
/// # Host-side write batch for uploads, in bytes (default: 65536)
/// transfer_buffer_bytes = 65536
///
/// # Workspace file used by snapshot save/load (default: ".RData")
/// workspace_file = ".RData"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Write batch size used when streaming payloads into remote files.
    #[serde(default = "default_transfer_buffer_bytes")]
    pub transfer_buffer_bytes: usize,
    /// File the backend saves its workspace to and loads it from.
    #[serde(default = "default_workspace_file")]
    pub workspace_file: String,
}

fn default_transfer_buffer_bytes() -> usize {
    TRANSFER_BUFFER_BYTES
}

fn default_workspace_file() -> String {
    WORKSPACE_FILE.to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            transfer_buffer_bytes: default_transfer_buffer_bytes(),
            workspace_file: default_workspace_file(),
        }
    }
}

impl ExecutorConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer size is zero, or if the workspace file
    /// name is empty or contains a `/`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transfer_buffer_bytes == 0 {
            return Err(ConfigError::Invalid(
                "transfer_buffer_bytes must be greater than 0".to_string(),
            ));
        }
        if self.workspace_file.is_empty() {
            return Err(ConfigError::Invalid(
                "workspace_file must not be empty".to_string(),
            ));
        }
        if self.workspace_file.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "workspace_file '{}' must be a plain file name",
                self.workspace_file
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# rexec executor configuration
#
# Host-side write batch for uploads into the R session, in bytes.
# Each write on the session channel has framing overhead; 64 KiB
# amortizes it and fits in a single frame on every transport.
transfer_buffer_bytes = 65536

# Workspace file written by save.image() and read by load().
# It lives in the session's scratch directory.
workspace_file = ".RData"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ExecutorConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
