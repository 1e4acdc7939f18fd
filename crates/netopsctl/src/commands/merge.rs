use anyhow::{bail, Result};
use netops_core::{Device, NetopsConfig};
use netops_tools::Reconciliation;

use crate::output;

/// Print the merged inventory
pub async fn execute(config: &NetopsConfig, output: &str) -> Result<()> {
    let rec = Reconciliation::run(config).await?;
    let merged = &rec.merged;

    match output {
        "json" => println!("{}", serde_json::to_string_pretty(merged)?),
        "yaml" => print!("{}", serde_yaml::to_string(merged)?),
        "name" => {
            for device in &merged.devices {
                println!("device/{}", device.name);
            }
        }
        "table" | "wide" => {
            let refs: Vec<&Device> = merged.devices.iter().collect();
            println!("{}", output::device_table(&refs));
            println!(
                "{} merged devices (local {}, NetBox {} from {})",
                merged.len(),
                rec.local.len(),
                rec.remote.len(),
                output::origin_label(&rec.origin)
            );
        }
        other => bail!("Unknown output format: {}", other),
    }

    Ok(())
}
