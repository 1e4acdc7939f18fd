//! Read-only lookups over a snapshot

use super::model::{Device, InventorySnapshot, Vlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Case-insensitive exact name lookup
pub fn find_device<'a>(snapshot: &'a InventorySnapshot, name: &str) -> Option<&'a Device> {
    let key = name.trim().to_lowercase();
    snapshot.devices.iter().find(|d| d.name_key() == key)
}

/// Attribute filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// Substring match, so `leaf` also selects `leaf-access`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl DeviceFilter {
    pub fn os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.os.is_none() && self.role.is_none() && self.vendor.is_none()
    }

    pub fn matches(&self, device: &Device) -> bool {
        let eq = |want: &Option<String>, have: &str| {
            want.as_deref().map_or(true, |w| w.eq_ignore_ascii_case(have))
        };
        let role_ok = self.role.as_deref().map_or(true, |r| {
            device.role.to_lowercase().contains(&r.to_lowercase())
        });
        eq(&self.os, &device.os) && eq(&self.vendor, &device.vendor) && role_ok
    }
}

pub fn filter_devices<'a>(
    snapshot: &'a InventorySnapshot,
    filter: &DeviceFilter,
) -> Vec<&'a Device> {
    snapshot
        .devices
        .iter()
        .filter(|d| filter.matches(d))
        .collect()
}

/// A device carrying a given VLAN, flattened for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VlanMembership {
    pub name: String,
    pub ip: String,
    pub vendor: String,
    pub os: String,
    pub role: String,
    pub vlan: Vlan,
}

pub fn devices_on_vlan(snapshot: &InventorySnapshot, vlan_id: u32) -> Vec<VlanMembership> {
    snapshot
        .devices
        .iter()
        .filter_map(|device| {
            device.vlan(vlan_id).map(|vlan| VlanMembership {
                name: device.name.clone(),
                ip: device.ip.clone(),
                vendor: device.vendor.clone(),
                os: device.os.clone(),
                role: device.role.clone(),
                vlan: vlan.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanMember {
    pub name: String,
    pub ip: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanRow {
    pub vlan_id: u32,
    pub vlan_name: String,
    pub devices: Vec<VlanMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanTable {
    #[serde(rename = "vlan_table")]
    pub vlans: Vec<VlanRow>,
    pub total_vlans: usize,
    pub total_devices: usize,
}

/// One row per VLAN id, ascending. The row name is the first name seen for
/// that id; `total_devices` counts every device in the snapshot.
pub fn vlan_table(snapshot: &InventorySnapshot) -> VlanTable {
    let mut rows: BTreeMap<u32, VlanRow> = BTreeMap::new();
    for device in &snapshot.devices {
        for vlan in &device.vlans {
            let row = rows.entry(vlan.id).or_insert_with(|| VlanRow {
                vlan_id: vlan.id,
                vlan_name: vlan.name.clone(),
                devices: Vec::new(),
            });
            if !row.devices.iter().any(|m| m.name == device.name) {
                row.devices.push(VlanMember {
                    name: device.name.clone(),
                    ip: device.ip.clone(),
                    role: device.role.clone(),
                });
            }
        }
    }

    let vlans: Vec<VlanRow> = rows.into_values().collect();
    VlanTable {
        total_vlans: vlans.len(),
        total_devices: snapshot.len(),
        vlans,
    }
}
