//! Mismatch detection between a local and a remote snapshot
//!
//! Three independent passes whose results are concatenated in order:
//! local devices missing remotely, remote devices missing locally, then
//! field comparisons for every local device that has a remote counterpart.
//! `VLAN_MISMATCH` and `NAME_MISMATCH` are defined categories with no
//! detection logic yet.

use super::index::DeviceIndex;
use super::model::{Device, InventoryMismatch, InventorySnapshot, MismatchCategory};
use tracing::debug;

pub fn detect_mismatches(
    local: &InventorySnapshot,
    remote: &InventorySnapshot,
) -> Vec<InventoryMismatch> {
    let local_index = DeviceIndex::new(&local.devices);
    let remote_index = DeviceIndex::new(&remote.devices);
    let mut mismatches = Vec::new();

    for device in &local.devices {
        if remote_index.find(device).is_none() {
            mismatches.push(
                InventoryMismatch::new(
                    MismatchCategory::MissingInNetbox,
                    device.name.as_str(),
                    device.name.as_str(),
                    "Not found in NetBox",
                )
                .with_details(format!(
                    "Device {} ({}) exists in YAML but not in NetBox",
                    device.name, device.ip
                )),
            );
        }
    }

    for device in &remote.devices {
        if local_index.find(device).is_none() {
            mismatches.push(
                InventoryMismatch::new(
                    MismatchCategory::MissingInYaml,
                    device.name.as_str(),
                    "Not found in YAML",
                    device.name.as_str(),
                )
                .with_details(format!(
                    "Device {} ({}) exists in NetBox but not in YAML",
                    device.name, device.ip
                )),
            );
        }
    }

    for device in &local.devices {
        if let Some(counterpart) = remote_index.find(device) {
            compare_fields(device, counterpart, &mut mismatches);
        }
    }

    debug!(count = mismatches.len(), "Detected inventory mismatches");
    mismatches
}

fn compare_fields(local: &Device, remote: &Device, out: &mut Vec<InventoryMismatch>) {
    if differs(&local.role, &remote.role) {
        out.push(
            InventoryMismatch::new(
                MismatchCategory::RoleMismatch,
                local.name.as_str(),
                local.role.as_str(),
                remote.role.as_str(),
            )
            .with_details(format!("Role mismatch for {}", local.name)),
        );
    }

    if differs(&local.vendor, &remote.vendor) {
        out.push(
            InventoryMismatch::new(
                MismatchCategory::VendorMismatch,
                local.name.as_str(),
                local.vendor.as_str(),
                remote.vendor.as_str(),
            )
            .with_details(format!("Vendor mismatch for {}", local.name)),
        );
    }
}

/// Both sides set and not equal ignoring case
fn differs(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && a.to_lowercase() != b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::model::SnapshotSource;

    fn yaml(devices: Vec<Device>) -> InventorySnapshot {
        InventorySnapshot::new(devices, SnapshotSource::Yaml)
    }

    fn netbox(devices: Vec<Device>) -> InventorySnapshot {
        InventorySnapshot::new(devices, SnapshotSource::Netbox)
    }

    #[test]
    fn test_role_mismatch() {
        let local = yaml(vec![Device::new("sw1", "10.0.0.1", "", "", "leaf")]);
        let remote = netbox(vec![Device::new("sw1", "10.0.0.1", "", "", "spine")]);

        let mismatches = detect_mismatches(&local, &remote);
        assert_eq!(mismatches.len(), 1);
        let m = &mismatches[0];
        assert_eq!(m.category, MismatchCategory::RoleMismatch);
        assert_eq!(m.expected, "leaf");
        assert_eq!(m.observed, "spine");
        assert_eq!(m.device_name, "sw1");
    }

    #[test]
    fn test_missing_in_netbox() {
        let local = yaml(vec![
            Device::new("sw1", "10.0.0.1", "", "", ""),
            Device::new("sw2", "10.0.0.2", "", "", ""),
        ]);
        let remote = netbox(vec![Device::new("sw1", "10.0.0.1", "", "", "")]);

        let mismatches = detect_mismatches(&local, &remote);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].category, MismatchCategory::MissingInNetbox);
        assert_eq!(mismatches[0].device_name, "sw2");
        assert_eq!(mismatches[0].observed, "Not found in NetBox");
    }

    #[test]
    fn test_missing_in_yaml() {
        let local = yaml(vec![]);
        let remote = netbox(vec![Device::new("sw9", "10.0.0.9", "", "", "")]);

        let mismatches = detect_mismatches(&local, &remote);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].category, MismatchCategory::MissingInYaml);
        assert_eq!(mismatches[0].expected, "Not found in YAML");
    }

    #[test]
    fn test_self_comparison_has_no_missing() {
        let snapshot = yaml(vec![
            Device::new("a", "10.0.0.1", "Cisco", "IOS", "core"),
            Device::new("b", "", "Arista", "EOS", "leaf"),
        ]);
        let mismatches = detect_mismatches(&snapshot, &snapshot);
        assert!(mismatches.is_empty());
    }

    #[test]
    fn test_ip_match_counts_as_present_and_compares_fields() {
        let local = yaml(vec![Device::new("old", "10.0.0.1", "cisco", "", "leaf")]);
        let remote = netbox(vec![Device::new("new", "10.0.0.1", "Arista", "", "")]);

        let mismatches = detect_mismatches(&local, &remote);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].category, MismatchCategory::VendorMismatch);
        assert_eq!(mismatches[0].device_name, "old");
    }

    #[test]
    fn test_case_insensitive_and_empty_fields_are_not_mismatches() {
        let local = yaml(vec![Device::new("a", "", "CISCO", "", "")]);
        let remote = netbox(vec![Device::new("A", "", "Cisco", "", "spine")]);
        assert!(detect_mismatches(&local, &remote).is_empty());
    }

    #[test]
    fn test_pass_order_is_preserved() {
        let local = yaml(vec![
            Device::new("shared", "", "Cisco", "", "leaf"),
            Device::new("local-only", "", "", "", ""),
        ]);
        let remote = netbox(vec![
            Device::new("remote-only", "", "", "", ""),
            Device::new("shared", "", "Arista", "", "spine"),
        ]);

        let categories: Vec<MismatchCategory> = detect_mismatches(&local, &remote)
            .into_iter()
            .map(|m| m.category)
            .collect();
        assert_eq!(
            categories,
            vec![
                MismatchCategory::MissingInNetbox,
                MismatchCategory::MissingInYaml,
                MismatchCategory::RoleMismatch,
                MismatchCategory::VendorMismatch,
            ]
        );
    }
}
