//! Merge engine
//!
//! Combines a local (declarative) snapshot with a remote (source of truth)
//! snapshot. Remote devices are walked first and win identity fields; local
//! data fills gaps and keeps its VLAN lists.

use super::index::DeviceIndex;
use super::model::{Device, InventorySnapshot, SnapshotSource};
use std::collections::HashSet;
use tracing::debug;

/// Merge two snapshots into a new one tagged `merged`.
///
/// Output order: every remote device (merged with its local counterpart when
/// one exists), followed by local devices that no remote device consumed.
pub fn merge(local: &InventorySnapshot, remote: &InventorySnapshot) -> InventorySnapshot {
    let index = DeviceIndex::new(&local.devices);
    let mut processed_names: HashSet<String> = HashSet::with_capacity(remote.len());
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut devices = Vec::with_capacity(remote.len() + local.len());

    for remote_device in &remote.devices {
        processed_names.insert(remote_device.name_key());

        match index.position(remote_device) {
            Some(idx) => {
                consumed.insert(idx);
                devices.push(merge_device(&local.devices[idx], remote_device));
            }
            None => devices.push(remote_device.clone()),
        }
    }

    let remote_count = devices.len();
    for (idx, local_device) in local.devices.iter().enumerate() {
        if consumed.contains(&idx) || processed_names.contains(&local_device.name_key()) {
            continue;
        }
        devices.push(local_device.clone());
    }

    debug!(
        remote = remote_count,
        local_only = devices.len() - remote_count,
        "Merged inventories"
    );

    InventorySnapshot::new(devices, SnapshotSource::Merged)
}

/// Field-level precedence for a matched pair
fn merge_device(local: &Device, remote: &Device) -> Device {
    Device {
        name: remote.name.clone(),
        ip: prefer(&remote.ip, &local.ip),
        vendor: prefer(&remote.vendor, &local.vendor),
        os: prefer(&remote.os, &local.os),
        role: prefer(&remote.role, &local.role),
        region: remote
            .region
            .clone()
            .filter(|r| !r.is_empty())
            .or_else(|| local.region.clone()),
        vlans: if local.vlans.is_empty() {
            remote.vlans.clone()
        } else {
            local.vlans.clone()
        },
        interfaces: local
            .interfaces
            .clone()
            .filter(|i| !i.is_empty())
            .or_else(|| remote.interfaces.clone()),
    }
}

fn prefer(primary: &str, fallback: &str) -> String {
    if primary.is_empty() {
        fallback.to_string()
    } else {
        primary.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::model::Vlan;

    fn snapshot(devices: Vec<Device>, source: SnapshotSource) -> InventorySnapshot {
        InventorySnapshot::new(devices, source)
    }

    #[test]
    fn test_merge_keeps_local_vlans() {
        let local = snapshot(
            vec![Device::new("sw1", "10.0.0.1", "Cisco", "NX-OS", "leaf")
                .with_vlans(vec![Vlan::new(10, "mgmt")])],
            SnapshotSource::Yaml,
        );
        let remote = snapshot(
            vec![Device::new("sw1", "10.0.0.1", "Cisco", "NX-OS", "leaf")],
            SnapshotSource::Netbox,
        );

        let merged = merge(&local, &remote);
        assert_eq!(merged.source, SnapshotSource::Merged);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.devices[0].vlans, vec![Vlan::new(10, "mgmt")]);
    }

    #[test]
    fn test_merge_interfaces_prefer_local_list() {
        let local = snapshot(
            vec![
                Device::new("sw1", "10.0.0.1", "Cisco", "NX-OS", "leaf")
                    .with_interfaces(vec!["Ethernet1/1".into()]),
                Device::new("sw2", "10.0.0.2", "Cisco", "NX-OS", "leaf").with_interfaces(vec![]),
            ],
            SnapshotSource::Yaml,
        );
        let remote = snapshot(
            vec![
                Device::new("sw1", "10.0.0.1", "Cisco", "NX-OS", "leaf")
                    .with_interfaces(vec!["Ethernet9".into()]),
                Device::new("sw2", "10.0.0.2", "Cisco", "NX-OS", "leaf")
                    .with_interfaces(vec!["Ethernet0".into()]),
            ],
            SnapshotSource::Netbox,
        );

        let merged = merge(&local, &remote);
        assert_eq!(
            merged.devices[0].interfaces,
            Some(vec!["Ethernet1/1".to_string()])
        );
        assert_eq!(
            merged.devices[1].interfaces,
            Some(vec!["Ethernet0".to_string()])
        );
    }

    #[test]
    fn test_merge_prefers_remote_fields_with_local_fallback() {
        let local = snapshot(
            vec![Device::new("SW1", "10.0.0.1", "Cisco", "NX-OS", "leaf").with_region("dc1")],
            SnapshotSource::Yaml,
        );
        let remote = snapshot(
            vec![Device::new("sw1", "", "Arista", "", "spine")],
            SnapshotSource::Netbox,
        );

        let merged = merge(&local, &remote);
        let device = &merged.devices[0];
        assert_eq!(device.name, "sw1");
        assert_eq!(device.ip, "10.0.0.1");
        assert_eq!(device.vendor, "Arista");
        assert_eq!(device.os, "NX-OS");
        assert_eq!(device.role, "spine");
        assert_eq!(device.region.as_deref(), Some("dc1"));
    }

    #[test]
    fn test_merge_order_remote_then_local_only() {
        let local = snapshot(
            vec![
                Device::new("local-only", "10.0.0.9", "", "", ""),
                Device::new("shared", "10.0.0.1", "", "", ""),
            ],
            SnapshotSource::Yaml,
        );
        let remote = snapshot(
            vec![
                Device::new("remote-only", "10.0.0.5", "", "", ""),
                Device::new("shared", "10.0.0.1", "", "", ""),
            ],
            SnapshotSource::Netbox,
        );

        let merged = merge(&local, &remote);
        let names: Vec<&str> = merged.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["remote-only", "shared", "local-only"]);
    }

    #[test]
    fn test_merge_ip_match_consumes_local_device() {
        let local = snapshot(
            vec![Device::new("old-name", "10.0.0.1", "Cisco", "IOS", "core")
                .with_vlans(vec![Vlan::new(20, "data")])],
            SnapshotSource::Yaml,
        );
        let remote = snapshot(
            vec![Device::new("new-name", "10.0.0.1", "", "", "")],
            SnapshotSource::Netbox,
        );

        let merged = merge(&local, &remote);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.devices[0].name, "new-name");
        assert_eq!(merged.devices[0].vendor, "Cisco");
        assert_eq!(merged.devices[0].vlans.len(), 1);
    }

    #[test]
    fn test_self_merge_preserves_length() {
        let devices = vec![
            Device::new("a", "10.0.0.1", "Cisco", "IOS", "core"),
            Device::new("b", "10.0.0.2", "Arista", "EOS", "leaf"),
            Device::new("c", "", "EdgeCore", "SONiC", "spine"),
        ];
        let s = snapshot(devices, SnapshotSource::Yaml);
        assert_eq!(merge(&s, &s).len(), s.len());
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let local = snapshot(vec![Device::new("a", "", "", "", "")], SnapshotSource::Yaml);
        let remote = snapshot(vec![Device::new("b", "", "", "", "")], SnapshotSource::Netbox);
        let before = (local.clone(), remote.clone());
        let _ = merge(&local, &remote);
        assert_eq!((local, remote), before);
    }
}
