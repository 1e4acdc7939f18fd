use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use netops_core::{devices_on_vlan, filter_devices, find_device, vlan_table, DeviceFilter, NetopsConfig};

use super::load_snapshot;
use crate::output;

#[derive(Subcommand, Debug)]
pub enum GetResource {
    /// List devices, or show one device by name
    #[command(alias = "device")]
    Devices {
        /// Device name (case-insensitive)
        name: Option<String>,

        /// Only devices running this OS
        #[arg(long)]
        os: Option<String>,

        /// Only devices whose role contains this value
        #[arg(long)]
        role: Option<String>,

        /// Only devices from this vendor
        #[arg(long)]
        vendor: Option<String>,

        /// Snapshot to read (local, netbox, merged)
        #[arg(long, default_value = "local")]
        source: String,

        /// Output format (json, yaml, name, table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// List VLANs, or the devices carrying one VLAN
    #[command(alias = "vlan")]
    Vlans {
        /// VLAN id
        id: Option<u32>,

        /// Snapshot to read (local, netbox, merged)
        #[arg(long, default_value = "local")]
        source: String,

        /// Output format (json, yaml, name, table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

/// Get inventory resources (kubectl-style: get <resource> [name])
pub async fn execute(resource: GetResource, config: &NetopsConfig) -> Result<()> {
    match resource {
        GetResource::Devices {
            name,
            os,
            role,
            vendor,
            source,
            output,
        } => {
            let snapshot = load_snapshot(config, &source).await?;

            let devices = match name {
                Some(name) => vec![find_device(&snapshot, &name)
                    .ok_or_else(|| anyhow!("Device not found: {}", name))?],
                None => {
                    let filter = DeviceFilter { os, role, vendor };
                    filter_devices(&snapshot, &filter)
                }
            };

            match output.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&devices)?),
                "yaml" => print!("{}", serde_yaml::to_string(&devices)?),
                "name" => {
                    for device in &devices {
                        println!("device/{}", device.name);
                    }
                }
                "table" | "wide" => println!("{}", output::device_table(&devices)),
                other => bail!("Unknown output format: {}", other),
            }
        }
        GetResource::Vlans { id, source, output } => {
            let snapshot = load_snapshot(config, &source).await?;

            match id {
                Some(vlan_id) => {
                    let members = devices_on_vlan(&snapshot, vlan_id);
                    match output.as_str() {
                        "json" => println!("{}", serde_json::to_string_pretty(&members)?),
                        "yaml" => print!("{}", serde_yaml::to_string(&members)?),
                        "name" => {
                            for member in &members {
                                println!("device/{}", member.name);
                            }
                        }
                        "table" | "wide" => {
                            println!("{}", output::vlan_members_table(vlan_id, &members))
                        }
                        other => bail!("Unknown output format: {}", other),
                    }
                }
                None => {
                    let table = vlan_table(&snapshot);
                    match output.as_str() {
                        "json" => println!("{}", serde_json::to_string_pretty(&table)?),
                        "yaml" => print!("{}", serde_yaml::to_string(&table)?),
                        "name" => {
                            for row in &table.vlans {
                                println!("vlan/{}", row.vlan_id);
                            }
                        }
                        "table" | "wide" => println!("{}", output::vlan_summary_table(&table)),
                        other => bail!("Unknown output format: {}", other),
                    }
                }
            }
        }
    }

    Ok(())
}
