//! Inventory Tools
//!
//! Tools for querying the device inventory and reconciling it with NetBox.
//!
//! ## Available Tools
//!
//! - `inventory_device_info` - Look up one device or list/filter devices
//! - `inventory_vlan_lookup` - Devices carrying a VLAN
//! - `inventory_vlan_table` - Every VLAN with its member devices
//! - `inventory_group` - Group merged devices by vendor, role, OS or region
//! - `inventory_mismatches` - Differences between the local inventory and NetBox
//! - `inventory_report` - Pass/fail report over the merged inventory
//!
//! Every call re-reads the local inventory; reconciliation tools also reload
//! NetBox (or its fixture).

use crate::identity::CommandProbe;
use crate::reconcile::Reconciliation;
use async_trait::async_trait;
use netops_core::inventory::query::{
    devices_on_vlan, filter_devices, find_device, vlan_table, DeviceFilter,
};
use netops_core::{
    group_by, load_local_inventory, GroupDimension, InventorySnapshot, NetopsConfig,
    NetopsError, NetopsResult, Tool, ToolConfig, ToolInput, ToolResult,
};
use std::sync::Arc;
use tracing::debug;

use super::common::{create_schema, tool_config_with_timeout};

/// Collection of all inventory tools
pub struct InventoryTools;

impl InventoryTools {
    /// Get all inventory tools sharing one configuration
    pub fn all(config: Arc<NetopsConfig>) -> Vec<Box<dyn Tool>> {
        vec![
            Box::new(DeviceInfoTool::new(config.clone())),
            Box::new(VlanLookupTool::new(config.clone())),
            Box::new(VlanTableTool::new(config.clone())),
            Box::new(GroupTool::new(config.clone())),
            Box::new(MismatchTool::new(config.clone())),
            Box::new(ReportTool::new(config)),
        ]
    }
}

/// Which snapshot a query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Local,
    Merged,
}

impl Source {
    fn from_input(input: &ToolInput, default: Source) -> NetopsResult<Source> {
        match input.get_arg::<String>("source").ok().as_deref() {
            None => Ok(default),
            Some("local") | Some("yaml") => Ok(Source::Local),
            Some("merged") => Ok(Source::Merged),
            Some(other) => Err(NetopsError::invalid_argument(format!(
                "Unknown source '{}' (expected local or merged)",
                other
            ))),
        }
    }
}

async fn load_snapshot(config: &NetopsConfig, source: Source) -> NetopsResult<InventorySnapshot> {
    match source {
        Source::Local => load_local_inventory(&config.inventory.path),
        Source::Merged => Ok(Reconciliation::run(config).await?.merged),
    }
}

fn load_failure(e: NetopsError) -> ToolResult {
    ToolResult::error(format!("Failed to load device inventory: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> NetopsResult<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

// ============================================================================
// Device Info Tool
// ============================================================================

/// Look up a device by name, or list devices with optional filters
pub struct DeviceInfoTool {
    config: ToolConfig,
    inventory: Arc<NetopsConfig>,
}

impl DeviceInfoTool {
    pub fn new(inventory: Arc<NetopsConfig>) -> Self {
        let parameters = create_schema(
            serde_json::json!({
                "device_name": {
                    "type": "string",
                    "description": "Exact device name (case-insensitive)"
                },
                "query_type": {
                    "type": "string",
                    "description": "all, sonic, by_role, by_vendor or by_os",
                    "enum": ["all", "sonic", "by_role", "by_vendor", "by_os"]
                },
                "os": {
                    "type": "string",
                    "description": "Only devices running this OS"
                },
                "role": {
                    "type": "string",
                    "description": "Only devices whose role contains this text"
                },
                "vendor": {
                    "type": "string",
                    "description": "Only devices from this vendor"
                },
                "source": {
                    "type": "string",
                    "description": "local (default) or merged",
                    "enum": ["local", "merged"]
                }
            }),
            vec![],
        );

        Self {
            config: tool_config_with_timeout(
                "inventory_device_info",
                "Get device information from the inventory: a single device by name, or a filtered list.",
                parameters,
                30,
            ),
            inventory,
        }
    }
}

#[async_trait]
impl Tool for DeviceInfoTool {
    async fn execute(&self, input: ToolInput) -> NetopsResult<ToolResult> {
        let device_name: Option<String> = input.get_arg("device_name").ok();
        let query_type: Option<String> = input.get_arg("query_type").ok();
        let source = Source::from_input(&input, Source::Local)?;
        let mut filter = DeviceFilter {
            os: input.get_arg("os").ok(),
            role: input.get_arg("role").ok(),
            vendor: input.get_arg("vendor").ok(),
        };

        debug!(device = ?device_name, query_type = ?query_type, "Querying device info");

        let snapshot = match load_snapshot(&self.inventory, source).await {
            Ok(s) => s,
            Err(e) => return Ok(load_failure(e)),
        };

        if let Some(name) = device_name.filter(|n| !n.trim().is_empty()) {
            return match find_device(&snapshot, &name) {
                Some(device) => Ok(ToolResult::success(serde_json::json!({
                    "device": device,
                    "devices": [device],
                    "count": 1
                }))),
                None => Ok(ToolResult::error(format!(
                    "Device '{}' not found in inventory",
                    name
                ))),
            };
        }

        let grouping = match query_type.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("all") => None,
            Some("sonic") | Some("sonic devices") => {
                filter.os.get_or_insert_with(|| "sonic".to_string());
                None
            }
            Some("by_role") | Some("role") => Some(GroupDimension::Role),
            Some("by_vendor") | Some("vendor") => Some(GroupDimension::Vendor),
            Some("by_os") | Some("os") => Some(GroupDimension::Os),
            Some(_) => None,
        };

        let devices = filter_devices(&snapshot, &filter);
        let mut data = serde_json::json!({
            "devices": devices,
            "count": devices.len(),
        });

        if let Some(dim) = grouping {
            data[format!("grouped_by_{}", dim)] = to_json(&group_by(&snapshot, dim))?;
        }

        Ok(ToolResult::success(data))
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }
}

// ============================================================================
// VLAN Lookup Tool
// ============================================================================

/// Find every device carrying a VLAN
pub struct VlanLookupTool {
    config: ToolConfig,
    inventory: Arc<NetopsConfig>,
}

impl VlanLookupTool {
    pub fn new(inventory: Arc<NetopsConfig>) -> Self {
        let parameters = create_schema(
            serde_json::json!({
                "vlan_id": {
                    "type": "integer",
                    "description": "VLAN ID to search for"
                }
            }),
            vec!["vlan_id"],
        );

        Self {
            config: tool_config_with_timeout(
                "inventory_vlan_lookup",
                "Find all devices connected to a VLAN, with the VLAN entry each device carries.",
                parameters,
                30,
            ),
            inventory,
        }
    }
}

#[async_trait]
impl Tool for VlanLookupTool {
    async fn execute(&self, input: ToolInput) -> NetopsResult<ToolResult> {
        let vlan_id: u32 = input.get_arg("vlan_id")?;

        let snapshot = match load_local_inventory(&self.inventory.inventory.path) {
            Ok(s) => s,
            Err(e) => return Ok(load_failure(e)),
        };

        let devices = devices_on_vlan(&snapshot, vlan_id);
        Ok(ToolResult::success(serde_json::json!({
            "vlan_id": vlan_id,
            "count": devices.len(),
            "devices": devices,
        })))
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }
}

// ============================================================================
// VLAN Table Tool
// ============================================================================

/// All VLANs and the devices on each
pub struct VlanTableTool {
    config: ToolConfig,
    inventory: Arc<NetopsConfig>,
}

impl VlanTableTool {
    pub fn new(inventory: Arc<NetopsConfig>) -> Self {
        Self {
            config: tool_config_with_timeout(
                "inventory_vlan_table",
                "Generate a VLAN table showing every VLAN and the devices on it, sorted by VLAN ID.",
                create_schema(serde_json::json!({}), vec![]),
                30,
            ),
            inventory,
        }
    }
}

#[async_trait]
impl Tool for VlanTableTool {
    async fn execute(&self, _input: ToolInput) -> NetopsResult<ToolResult> {
        let snapshot = match load_local_inventory(&self.inventory.inventory.path) {
            Ok(s) => s,
            Err(e) => return Ok(load_failure(e)),
        };
        Ok(ToolResult::success(to_json(&vlan_table(&snapshot))?))
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }
}

// ============================================================================
// Group Tool
// ============================================================================

/// Partition devices by one attribute
pub struct GroupTool {
    config: ToolConfig,
    inventory: Arc<NetopsConfig>,
}

impl GroupTool {
    pub fn new(inventory: Arc<NetopsConfig>) -> Self {
        let parameters = create_schema(
            serde_json::json!({
                "dimension": {
                    "type": "string",
                    "description": "Attribute to group by",
                    "enum": ["vendor", "role", "os", "region"]
                },
                "source": {
                    "type": "string",
                    "description": "merged (default) or local",
                    "enum": ["local", "merged"]
                }
            }),
            vec!["dimension"],
        );

        Self {
            config: tool_config_with_timeout(
                "inventory_group",
                "Group devices by vendor, role, OS or region. Groups are listed in first-seen order.",
                parameters,
                60,
            ),
            inventory,
        }
    }
}

#[async_trait]
impl Tool for GroupTool {
    async fn execute(&self, input: ToolInput) -> NetopsResult<ToolResult> {
        let dimension: String = input.get_arg("dimension")?;
        let dimension: GroupDimension = dimension
            .parse()
            .map_err(NetopsError::invalid_argument)?;
        let source = Source::from_input(&input, Source::Merged)?;

        let snapshot = match load_snapshot(&self.inventory, source).await {
            Ok(s) => s,
            Err(e) => return Ok(load_failure(e)),
        };

        let groups = group_by(&snapshot, dimension);
        Ok(ToolResult::success(serde_json::json!({
            "dimension": dimension.as_str(),
            "total": snapshot.len(),
            "groups": to_json(&groups)?,
        })))
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }
}

// ============================================================================
// Mismatch Tool
// ============================================================================

/// Differences between the local inventory and NetBox
pub struct MismatchTool {
    config: ToolConfig,
    inventory: Arc<NetopsConfig>,
}

impl MismatchTool {
    pub fn new(inventory: Arc<NetopsConfig>) -> Self {
        Self {
            config: tool_config_with_timeout(
                "inventory_mismatches",
                "Detect mismatches between the local YAML inventory and NetBox.",
                create_schema(serde_json::json!({}), vec![]),
                60,
            ),
            inventory,
        }
    }
}

#[async_trait]
impl Tool for MismatchTool {
    async fn execute(&self, _input: ToolInput) -> NetopsResult<ToolResult> {
        let rec = match Reconciliation::run(&self.inventory).await {
            Ok(r) => r,
            Err(e) => return Ok(load_failure(e)),
        };

        Ok(ToolResult::success(serde_json::json!({
            "count": rec.mismatches.len(),
            "mismatches": rec.mismatches,
            "remote": rec.origin,
        })))
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }
}

// ============================================================================
// Report Tool
// ============================================================================

/// Merged snapshot plus pass/fail report
pub struct ReportTool {
    config: ToolConfig,
    inventory: Arc<NetopsConfig>,
}

impl ReportTool {
    pub fn new(inventory: Arc<NetopsConfig>) -> Self {
        let parameters = create_schema(
            serde_json::json!({
                "export_format": {
                    "type": "string",
                    "description": "Preferred rendering for the caller",
                    "enum": ["none", "json", "md", "html"],
                    "default": "none"
                },
                "verify_identity": {
                    "type": "boolean",
                    "description": "Probe devices for their live hostname",
                    "default": false
                }
            }),
            vec![],
        );

        Self {
            config: tool_config_with_timeout(
                "inventory_report",
                "Generate an inventory report: merged devices, groupings, mismatches and pass/fail counts.",
                parameters,
                300,
            ),
            inventory,
        }
    }
}

#[async_trait]
impl Tool for ReportTool {
    async fn execute(&self, input: ToolInput) -> NetopsResult<ToolResult> {
        let export_format: String = input
            .get_arg("export_format")
            .unwrap_or_else(|_| "none".to_string());
        let verify: bool = input
            .get_arg("verify_identity")
            .unwrap_or(self.inventory.identity.enabled);

        let mut rec = match Reconciliation::run(&self.inventory).await {
            Ok(r) => r,
            Err(e) => return Ok(load_failure(e)),
        };

        if verify {
            let probe = CommandProbe::new(self.inventory.identity.clone());
            rec.verify_identity(true, &probe).await;
        }

        let report = rec.report();
        Ok(ToolResult::success(serde_json::json!({
            "snapshot": rec.merged,
            "report": report,
            "export_format": export_format,
            "remote": rec.origin,
        })))
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }
}
