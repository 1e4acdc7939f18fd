use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use netops_core::{InventoryReport, InventorySnapshot, NetopsConfig, ToolExecutor, ToolInput};
use netops_tools::{LoadOrigin, ToolRegistry};
use std::sync::Arc;
use tracing::debug;

use crate::output;
use crate::router::QueryRouter;

/// Answer a plain-language question by routing it to an inventory tool
pub async fn execute(config: Arc<NetopsConfig>, query: &str, output: &str) -> Result<()> {
    let route = QueryRouter::new()?.route(query);
    debug!(tool = route.tool, query_type = route.query_type, "Routed query");

    let executor = ToolRegistry::with_inventory_tools(config).into_executor();
    let result = executor
        .execute_tool(route.tool, ToolInput::new(route.arguments.clone()))
        .await?;

    match output {
        "json" => {
            let view = serde_json::json!({
                "query": query,
                "query_type": route.query_type,
                "tool": route.tool,
                "summary": result.success.then(|| route.summary(&result.data)),
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
            if !result.success {
                bail!("{} failed", route.tool);
            }
        }
        "text" => {
            if !result.success {
                bail!(result.error.unwrap_or_else(|| format!("{} failed", route.tool)));
            }
            println!("{}", route.summary(&result.data).bold());
            println!();
            println!("{}", render_data(&result.data)?);
        }
        other => bail!("Unknown output format: {}", other),
    }

    Ok(())
}

/// Reports asked for as Markdown or HTML are rendered; everything else is JSON
fn render_data(data: &serde_json::Value) -> Result<String> {
    let export = data["export_format"].as_str().unwrap_or("none");
    if !matches!(export, "md" | "html") {
        return Ok(serde_json::to_string_pretty(data)?);
    }

    let snapshot: InventorySnapshot = serde_json::from_value(data["snapshot"].clone())?;
    let report: InventoryReport = serde_json::from_value(data["report"].clone())?;
    let origin: LoadOrigin = serde_json::from_value(data["remote"].clone())
        .map_err(|e| anyhow!("Report is missing its remote origin: {}", e))?;

    let markdown = output::markdown_report(&snapshot, &report, &origin);
    Ok(if export == "html" {
        output::html_report(&markdown, "Inventory Report")
    } else {
        markdown
    })
}
