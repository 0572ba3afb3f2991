//! Error types for patch file operations.

use std::path::PathBuf;
use thiserror::Error;
use warpbus_core::HostError;

/// Errors that can occur while loading, saving or building a patch.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A patch file could not be read
    #[error("cannot read patch '{path}': {source}")]
    ReadFile {
        /// Patch path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A patch file could not be written
    #[error("cannot write patch '{path}': {source}")]
    WriteFile {
        /// Patch path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory a patch is saved into could not be created
    #[error("cannot create patch directory '{path}': {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to parse JSON
    #[error("failed to parse JSON: {0}")]
    JsonParse(#[source] serde_json::Error),

    /// Failed to serialize JSON
    #[error("failed to serialize JSON: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    /// Two nodes in one patch share a name
    #[error("duplicate node name in patch: {0}")]
    DuplicateNode(String),

    /// The patch declares no nodes
    #[error("patch '{0}' has no nodes")]
    EmptyPatch(String),

    /// The host rejected a structural edit
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl ConfigError {
    /// Wraps a failed patch read.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Wraps a failed patch write.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Wraps a failed patch directory creation.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
