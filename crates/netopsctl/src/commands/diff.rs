use anyhow::{bail, Result};
use colored::Colorize;
use netops_core::NetopsConfig;
use netops_tools::Reconciliation;

use crate::output;

/// Mismatches between the local inventory and NetBox
pub async fn execute(config: &NetopsConfig, output: &str) -> Result<()> {
    let rec = Reconciliation::run(config).await?;

    let view = serde_json::json!({
        "count": rec.mismatches.len(),
        "mismatches": rec.mismatches,
        "remote": rec.origin,
    });

    match output {
        "json" => println!("{}", output::to_stable_json(&view)?),
        "yaml" => print!("{}", serde_yaml::to_string(&view)?),
        "table" | "wide" => {
            println!(
                "Local: {} devices  NetBox: {} devices ({})",
                rec.local.len(),
                rec.remote.len(),
                output::origin_label(&rec.origin)
            );
            if rec.mismatches.is_empty() {
                println!("{}", "No mismatches found".green());
            } else {
                println!("{}", output::mismatch_table(&rec.mismatches));
                println!(
                    "{}",
                    format!("{} mismatch(es)", rec.mismatches.len()).yellow()
                );
            }
        }
        other => bail!("Unknown output format: {}", other),
    }

    Ok(())
}
