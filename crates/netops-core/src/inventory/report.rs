//! Grouping and report aggregation

use super::model::{Device, GroupCounts, InventoryMismatch, InventoryReport, InventorySnapshot};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Device attribute a snapshot can be partitioned by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupDimension {
    Vendor,
    Role,
    Os,
    Region,
}

impl GroupDimension {
    pub const ALL: [GroupDimension; 4] = [
        GroupDimension::Vendor,
        GroupDimension::Role,
        GroupDimension::Os,
        GroupDimension::Region,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupDimension::Vendor => "vendor",
            GroupDimension::Role => "role",
            GroupDimension::Os => "os",
            GroupDimension::Region => "region",
        }
    }

    /// Group value of a device; empty or absent values become `"unknown"`
    pub fn value_of<'a>(&self, device: &'a Device) -> &'a str {
        let value = match self {
            GroupDimension::Vendor => device.vendor.as_str(),
            GroupDimension::Role => device.role.as_str(),
            GroupDimension::Os => device.os.as_str(),
            GroupDimension::Region => device.region.as_deref().unwrap_or(""),
        };
        if value.is_empty() {
            "unknown"
        } else {
            value
        }
    }
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vendor" | "by_vendor" => Ok(GroupDimension::Vendor),
            "role" | "by_role" => Ok(GroupDimension::Role),
            "os" | "by_os" => Ok(GroupDimension::Os),
            "region" | "site" | "by_region" => Ok(GroupDimension::Region),
            other => Err(format!(
                "Unknown group dimension '{}' (expected vendor, role, os or region)",
                other
            )),
        }
    }
}

/// Ordered partition of devices. Groups iterate in first-seen order and
/// devices keep their snapshot order within a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceGroups {
    groups: Vec<(String, Vec<Device>)>,
}

impl DeviceGroups {
    pub fn get(&self, key: &str) -> Option<&[Device]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, devices)| devices.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Device])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.groups
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect()
    }
}

impl Serialize for DeviceGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, devices) in &self.groups {
            map.serialize_entry(key, devices)?;
        }
        map.end()
    }
}

pub fn group_by(snapshot: &InventorySnapshot, dimension: GroupDimension) -> DeviceGroups {
    let mut groups: Vec<(String, Vec<Device>)> = Vec::new();
    for device in &snapshot.devices {
        let key = dimension.value_of(device);
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, members)) => members.push(device.clone()),
            None => groups.push((key.to_string(), vec![device.clone()])),
        }
    }
    DeviceGroups { groups }
}

/// Assemble the pass/fail report for a merged snapshot.
///
/// `passed` is not clamped: several mismatches on one device can push it
/// below zero. `not_run` is always zero.
pub fn build_report(
    merged: &InventorySnapshot,
    mismatches: Vec<InventoryMismatch>,
) -> InventoryReport {
    let groups: GroupCounts = GroupDimension::ALL
        .iter()
        .map(|dim| (dim.as_str().to_string(), group_by(merged, *dim).counts()))
        .collect();

    InventoryReport {
        passed: merged.len() as i64 - mismatches.len() as i64,
        failed: mismatches.len(),
        not_run: 0,
        mismatches,
        groups,
    }
}
