//! Tool Registry - Central registration and discovery for tools
//!
//! The registry collects tools by name and turns into an executor that runs
//! them, timing each call.

use async_trait::async_trait;
use netops_core::{
    NetopsConfig, NetopsError, NetopsResult, Tool, ToolDefinition, ToolExecutor, ToolInput,
    ToolResult,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::tools::inventory::InventoryTools;

/// Tool registry for managing available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every inventory tool
    pub fn with_inventory_tools(config: Arc<NetopsConfig>) -> Self {
        let mut registry = Self::new();
        registry.register_category(InventoryTools::all(config));
        registry
    }

    /// Register a single tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        let name = tool.config().name.clone();
        info!(tool = %name, "Registering tool");
        self.tools.insert(name, Arc::new(tool));
        self
    }

    /// Register multiple tools from a category
    pub fn register_category(&mut self, tools: Vec<Box<dyn Tool>>) -> &mut Self {
        for tool in tools {
            let name = tool.config().name.clone();
            debug!(tool = %name, "Registering tool");
            self.tools.insert(name, Arc::from(tool));
        }
        self
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool names, sorted
    pub fn list_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// List tool definitions, sorted by name
    pub fn list_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Convert registry into a tool executor
    pub fn into_executor(self) -> BuiltinToolExecutor {
        BuiltinToolExecutor::new(self)
    }
}

/// Built-in tool executor that wraps the registry
pub struct BuiltinToolExecutor {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl BuiltinToolExecutor {
    /// Create from registry
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            tools: registry.tools,
        }
    }
}

#[async_trait]
impl ToolExecutor for BuiltinToolExecutor {
    async fn execute_tool(&self, name: &str, input: ToolInput) -> NetopsResult<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| NetopsError::tool(format!("Tool not found: {}", name)))?;

        debug!(tool = %name, "Executing built-in tool");
        let start = std::time::Instant::now();

        match tool.execute(input).await {
            Ok(result) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(tool = %name, elapsed_ms = %elapsed, success = %result.success, "Tool execution complete");
                Ok(result.with_execution_time(elapsed))
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool execution failed");
                Err(e)
            }
        }
    }

    fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }
}
