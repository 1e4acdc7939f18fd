pub mod ask;
pub mod completion;
pub mod diff;
pub mod get;
pub mod group;
pub mod merge;
pub mod report;
pub mod tools;

use anyhow::{bail, Result};
use netops_core::{load_local_inventory, InventorySnapshot, NetopsConfig};
use netops_tools::{load_remote_inventory, Reconciliation};

/// Load the snapshot a command should run against
pub(crate) async fn load_snapshot(config: &NetopsConfig, source: &str) -> Result<InventorySnapshot> {
    let snapshot = match source {
        "local" | "yaml" => load_local_inventory(&config.inventory.path)?,
        "netbox" | "remote" => load_remote_inventory(&config.netbox).await.snapshot,
        "merged" => Reconciliation::run(config).await?.merged,
        other => bail!(
            "Unknown source: {} (expected local, netbox or merged)",
            other
        ),
    };
    Ok(snapshot)
}
