use anyhow::{bail, Context as _, Result};
use netops_core::NetopsConfig;
use netops_tools::{CommandProbe, Reconciliation};
use std::path::Path;
use tracing::info;

use crate::output;

/// Reconcile both inventories and render a report
pub async fn execute(
    config: &NetopsConfig,
    format: &str,
    verify_identity: bool,
    save: Option<&Path>,
) -> Result<()> {
    if !matches!(format, "text" | "json" | "markdown" | "md" | "html") {
        bail!("Unknown report format: {} (expected text, json, markdown or html)", format);
    }

    let mut rec = Reconciliation::run(config).await?;

    if verify_identity || config.identity.enabled {
        let probe = CommandProbe::new(config.identity.clone());
        let found = rec.verify_identity(true, &probe).await;
        info!(mismatches = found, "Identity verification complete");
    }

    let report = rec.report();

    // Files never get terminal colors
    if save.is_some() {
        colored::control::set_override(false);
    }

    let rendered = match format {
        "json" => output::to_stable_json(&serde_json::json!({
            "snapshot": rec.merged,
            "report": report,
            "remote": rec.origin,
        }))?,
        "markdown" | "md" => output::markdown_report(&rec.merged, &report, &rec.origin),
        "html" => {
            let markdown = output::markdown_report(&rec.merged, &report, &rec.origin);
            output::html_report(&markdown, "Inventory Report")
        }
        _ => output::text_report(&rec.merged, &report, &rec.origin),
    };

    match save {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }

    Ok(())
}
