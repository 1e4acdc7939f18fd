// Netops Core - Inventory reconciliation types and logic
//
// This crate holds everything that does not touch the network: the device
// inventory model, vendor/OS/role normalization, the local loader, the merge
// engine, mismatch detection, grouping and reporting, plus configuration,
// errors and the tool trait shared by the other crates.

pub mod config;
pub mod error;
pub mod inventory;
pub mod tool;

pub use config::{IdentityConfig, InventoryConfig, NetboxConfig, NetopsConfig, PLACEHOLDER_TOKEN};
pub use error::{NetopsError, NetopsResult};
pub use inventory::{
    build_report, detect_mismatches, devices_on_vlan, filter_devices, find_device, group_by,
    load_local_inventory, merge, vlan_table, Device, DeviceFilter, DeviceGroups, GroupDimension,
    InventoryMismatch, InventoryReport, InventorySnapshot, MismatchCategory, SnapshotSource, Vlan,
    VlanMember, VlanMembership, VlanRow, VlanTable,
};
pub use tool::{Tool, ToolConfig, ToolDefinition, ToolExecutor, ToolInput, ToolResult, ToolType};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
