//! Tool abstraction
//!
//! A tool is a named, schema-described operation an agent (or the CLI's
//! query router) can invoke with JSON arguments and get JSON back.

use crate::error::{NetopsError, NetopsResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    /// Compiled into this workspace
    Builtin,
    #[default]
    Custom,
}

/// Static description of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    pub description: String,

    /// JSON schema of the accepted arguments
    pub parameters: serde_json::Value,

    #[serde(default)]
    pub tool_type: ToolType,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_timeout() -> u64 {
    30
}

/// What an agent sees when choosing a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Arguments for one invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    pub arguments: serde_json::Value,
}

impl ToolInput {
    pub fn new(arguments: serde_json::Value) -> Self {
        Self { arguments }
    }

    /// Fetch and deserialize a named argument
    pub fn get_arg<T: DeserializeOwned>(&self, name: &str) -> NetopsResult<T> {
        let value = self
            .arguments
            .get(name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                NetopsError::invalid_argument(format!("Missing required argument: {}", name))
            })?;
        serde_json::from_value(value.clone()).map_err(|e| {
            NetopsError::invalid_argument(format!("Invalid value for argument '{}': {}", name, e))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(default)]
    pub data: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub execution_time_ms: u64,
}

impl ToolResult {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
            execution_time_ms: 0,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            error: Some(message.into()),
            execution_time_ms: 0,
        }
    }

    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = ms;
        self
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    async fn execute(&self, input: ToolInput) -> NetopsResult<ToolResult>;

    fn config(&self) -> &ToolConfig;

    fn definition(&self) -> ToolDefinition {
        let config = self.config();
        ToolDefinition {
            name: config.name.clone(),
            description: config.description.clone(),
            parameters: config.parameters.clone(),
        }
    }
}

/// Looks tools up by name and runs them
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute_tool(&self, name: &str, input: ToolInput) -> NetopsResult<ToolResult>;

    fn list_tools(&self) -> Vec<ToolDefinition>;

    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>>;
}
