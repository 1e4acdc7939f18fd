use anyhow::{bail, Result};
use netops_core::NetopsConfig;
use netops_tools::ToolRegistry;
use std::sync::Arc;

use crate::output;

/// List the agent tools and their parameter schemas
pub fn execute(config: Arc<NetopsConfig>, output: &str) -> Result<()> {
    let registry = ToolRegistry::with_inventory_tools(config);
    let definitions = registry.list_definitions();

    match output {
        "json" => println!("{}", serde_json::to_string_pretty(&definitions)?),
        "yaml" => print!("{}", serde_yaml::to_string(&definitions)?),
        "name" => {
            for name in registry.list_names() {
                println!("tool/{}", name);
            }
        }
        "table" | "wide" => println!("{}", output::tool_table(&definitions)),
        other => bail!("Unknown output format: {}", other),
    }

    Ok(())
}
