//! Error types shared by every netops crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the workspace
pub type NetopsResult<T> = Result<T, NetopsError>;

#[derive(Debug, Error)]
pub enum NetopsError {
    /// Local inventory file does not exist
    #[error("Device inventory file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Local inventory file exists but could not be parsed
    #[error("Failed to parse inventory {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl NetopsError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// True for the two loud local-inventory failures
    pub fn is_local_inventory_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Parse { .. })
    }
}

impl From<serde_json::Error> for NetopsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for NetopsError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = NetopsError::NotFound {
            path: PathBuf::from("data/devices.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "Device inventory file not found: data/devices.yaml"
        );
        assert!(err.is_local_inventory_error());
    }

    #[test]
    fn test_tool_error_is_not_local() {
        let err = NetopsError::tool("boom");
        assert!(!err.is_local_inventory_error());
        assert_eq!(err.to_string(), "Tool error: boom");
    }
}
