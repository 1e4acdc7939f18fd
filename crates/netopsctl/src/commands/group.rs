use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use netops_core::{group_by, DeviceGroups, GroupDimension, NetopsConfig};
use serde::Serialize;

use super::load_snapshot;
use crate::output;

#[derive(Serialize)]
struct GroupView<'a> {
    dimension: &'a str,
    total: usize,
    groups: &'a DeviceGroups,
}

/// Partition a snapshot by vendor, role, os or region
pub async fn execute(config: &NetopsConfig, dimension: &str, source: &str, output: &str) -> Result<()> {
    let dimension: GroupDimension = dimension.parse().map_err(|e: String| anyhow!(e))?;
    let snapshot = load_snapshot(config, source).await?;
    let groups = group_by(&snapshot, dimension);

    let view = GroupView {
        dimension: dimension.as_str(),
        total: snapshot.len(),
        groups: &groups,
    };

    match output {
        "json" => println!("{}", serde_json::to_string_pretty(&view)?),
        "yaml" => print!("{}", serde_yaml::to_string(&view)?),
        "table" | "wide" => {
            if groups.is_empty() {
                println!("No devices found");
            }
            for (key, devices) in groups.iter() {
                println!(
                    "{} {} ({})",
                    format!("{}:", dimension).bold(),
                    key.cyan(),
                    devices.len()
                );
                let refs: Vec<_> = devices.iter().collect();
                println!("{}", output::device_table(&refs));
            }
        }
        other => bail!("Unknown output format: {}", other),
    }

    Ok(())
}
