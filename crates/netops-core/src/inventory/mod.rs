//! Inventory reconciliation
//!
//! Load a local and a remote snapshot, merge them, detect mismatches and
//! summarize the result:
//!
//! ```text
//! load_local_inventory ─┐
//!                       ├─> merge ─> group_by / build_report
//! remote snapshot ──────┘      └───> detect_mismatches
//! ```
//!
//! Everything here is synchronous and works on owned snapshot values. The
//! network-facing remote loader lives in `netops-tools`.

mod index;
pub mod loader;
pub mod merge;
pub mod mismatch;
pub mod model;
pub mod normalize;
pub mod query;
pub mod report;

pub use loader::load_local_inventory;
pub use merge::merge;
pub use mismatch::detect_mismatches;
pub use model::{
    Device, GroupCounts, InventoryMismatch, InventoryReport, InventorySnapshot, MismatchCategory,
    SnapshotSource, Vlan,
};
pub use normalize::{normalize_os, normalize_role, normalize_vendor};
pub use query::{
    devices_on_vlan, filter_devices, find_device, vlan_table, DeviceFilter, VlanMember,
    VlanMembership, VlanRow, VlanTable,
};
pub use report::{build_report, group_by, DeviceGroups, GroupDimension};
