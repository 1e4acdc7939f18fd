//! Inventory entity model
//!
//! Value types for devices, VLANs, snapshots, mismatches and reports.
//! Deserialization is deliberately lenient: inventory sources are hand-edited
//! or come from third-party APIs, so a missing or oddly shaped field falls back
//! to an empty value instead of failing the whole snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// VLAN membership entry. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u32,
    pub name: String,
}

impl Vlan {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A network device as seen by one inventory source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    /// Dotted-quad management address, empty when unknown
    #[serde(default, deserialize_with = "lenient::string")]
    pub ip: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub vendor: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub os: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::vlans",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub vlans: Vec<Vlan>,

    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "lenient::is_none_or_empty"
    )]
    pub interfaces: Option<Vec<String>>,
}

impl Device {
    pub fn new(
        name: impl Into<String>,
        ip: impl Into<String>,
        vendor: impl Into<String>,
        os: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            vendor: vendor.into(),
            os: os.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_vlans(mut self, vlans: Vec<Vlan>) -> Self {
        self.vlans = vlans;
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<String>) -> Self {
        self.interfaces = Some(interfaces);
        self
    }

    /// Primary join key: the lower-cased name
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Secondary join key, only present for a non-empty IP
    pub fn ip_key(&self) -> Option<&str> {
        if self.ip.is_empty() {
            None
        } else {
            Some(self.ip.as_str())
        }
    }

    /// First VLAN entry with this id
    pub fn vlan(&self, vlan_id: u32) -> Option<&Vlan> {
        self.vlans.iter().find(|v| v.id == vlan_id)
    }
}

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    #[default]
    Yaml,
    Netbox,
    Merged,
}

impl SnapshotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSource::Yaml => "yaml",
            SnapshotSource::Netbox => "netbox",
            SnapshotSource::Merged => "merged",
        }
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time collection of devices from a single source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub devices: Vec<Device>,

    #[serde(default = "Utc::now", deserialize_with = "lenient::timestamp")]
    pub generated_at: DateTime<Utc>,

    #[serde(default)]
    pub source: SnapshotSource,
}

impl InventorySnapshot {
    /// Fresh snapshot stamped with the current time
    pub fn new(devices: Vec<Device>, source: SnapshotSource) -> Self {
        Self {
            devices,
            generated_at: Utc::now(),
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Discrepancy categories between two inventory sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MismatchCategory {
    MissingInNetbox,
    MissingInYaml,
    NameMismatch,
    RoleMismatch,
    VendorMismatch,
    VlanMismatch,
    IdentityMismatch,
}

impl MismatchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchCategory::MissingInNetbox => "MISSING_IN_NETBOX",
            MismatchCategory::MissingInYaml => "MISSING_IN_YAML",
            MismatchCategory::NameMismatch => "NAME_MISMATCH",
            MismatchCategory::RoleMismatch => "ROLE_MISMATCH",
            MismatchCategory::VendorMismatch => "VENDOR_MISMATCH",
            MismatchCategory::VlanMismatch => "VLAN_MISMATCH",
            MismatchCategory::IdentityMismatch => "IDENTITY_MISMATCH",
        }
    }
}

impl fmt::Display for MismatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected discrepancy. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMismatch {
    pub category: MismatchCategory,
    pub expected: serde_json::Value,
    pub observed: serde_json::Value,
    pub device_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl InventoryMismatch {
    pub fn new(
        category: MismatchCategory,
        device_name: impl Into<String>,
        expected: impl Into<serde_json::Value>,
        observed: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            category,
            expected: expected.into(),
            observed: observed.into(),
            device_name: device_name.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Group counts keyed by dimension, then by group value
pub type GroupCounts = BTreeMap<String, BTreeMap<String, usize>>;

/// Pass/fail summary derived from a merged snapshot and its mismatches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryReport {
    /// Device count minus mismatch count; negative when a device carries
    /// more than one mismatch
    pub passed: i64,
    pub failed: usize,
    pub not_run: usize,
    #[serde(default)]
    pub mismatches: Vec<InventoryMismatch>,
    #[serde(default)]
    pub groups: GroupCounts,
}

/// Permissive field deserializers for heterogeneous source data
mod lenient {
    use super::Vlan;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Other(IgnoredAny),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Text(s) => s,
                Scalar::Int(i) => i.to_string(),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
                Scalar::Other(_) => String::new(),
            }
        }
    }

    /// VLAN ids arrive as integers or as quoted digits
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum VlanId {
        Num(u32),
        Text(String),
    }

    impl VlanId {
        fn value(self) -> Option<u32> {
            match self {
                VlanId::Num(id) => Some(id),
                VlanId::Text(s) => s.trim().parse().ok(),
            }
        }
    }

    /// A VLAN entry is either `{id, name}` or a bare id
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum VlanEntry {
        Id(VlanId),
        Full {
            #[serde(default)]
            id: Option<VlanId>,
            #[serde(default, deserialize_with = "string")]
            name: String,
        },
        Other(IgnoredAny),
    }

    impl VlanEntry {
        fn into_vlan(self) -> Option<Vlan> {
            match self {
                VlanEntry::Id(id) => id.value().map(|id| Vlan::new(id, "unknown")),
                VlanEntry::Full { id: None, name } => Some(Vlan::new(0, name)),
                VlanEntry::Full { id: Some(id), name } => id.value().map(|id| Vlan::new(id, name)),
                VlanEntry::Other(_) => None,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List<T> {
        Items(Vec<T>),
        Other(IgnoredAny),
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let value: Option<Scalar> = Option::deserialize(d)?;
        Ok(value.map(Scalar::into_string).unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = string(d)?;
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    pub fn vlans<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vlan>, D::Error> {
        let entries: Option<List<VlanEntry>> = Option::deserialize(d)?;
        Ok(match entries {
            Some(List::Items(items)) => items.into_iter().filter_map(VlanEntry::into_vlan).collect(),
            _ => Vec::new(),
        })
    }

    pub fn string_list<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        let entries: Option<List<Scalar>> = Option::deserialize(d)?;
        Ok(match entries {
            Some(List::Items(items)) => Some(items.into_iter().map(Scalar::into_string).collect()),
            _ => None,
        })
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let value: Option<Scalar> = Option::deserialize(d)?;
        let text = value.map(Scalar::into_string).unwrap_or_default();
        Ok(parse_timestamp(&text).unwrap_or_else(Utc::now))
    }

    pub(super) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn is_none_or_empty(value: &Option<Vec<String>>) -> bool {
        value.as_ref().map_or(true, |v| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_with_mixed_vlans() {
        let yaml = r#"
name: sonic-leaf-01
ip: 10.0.0.11
vendor: EdgeCore
os: SONiC
role: leaf
vlans:
  - id: 10
    name: mgmt
  - 20
  - { id: 30 }
  - "garbage"
  - { id: "40", name: storage }
  - "50"
"#;
        let device: Device = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(device.name, "sonic-leaf-01");
        assert_eq!(
            device.vlans,
            vec![
                Vlan::new(10, "mgmt"),
                Vlan::new(20, "unknown"),
                Vlan::new(30, ""),
                Vlan::new(40, "storage"),
                Vlan::new(50, "unknown"),
            ]
        );
        assert_eq!(device.vlan(40).map(|v| v.name.as_str()), Some("storage"));
        assert!(device.vlan(99).is_none());
        assert!(device.region.is_none());
        assert!(device.interfaces.is_none());
    }

    #[test]
    fn test_parse_device_missing_fields_defaults_to_empty() {
        let device: Device = serde_yaml::from_str("role: spine").unwrap();
        assert_eq!(device.name, "");
        assert_eq!(device.ip, "");
        assert_eq!(device.vendor, "");
        assert_eq!(device.role, "spine");
        assert!(device.vlans.is_empty());
    }

    #[test]
    fn test_parse_device_null_and_numeric_fields() {
        let yaml = r#"
name: core-1
ip: ~
vendor: 42
region: ""
vlans: 5
interfaces: [Ethernet0, 1]
"#;
        let device: Device = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(device.ip, "");
        assert_eq!(device.vendor, "42");
        assert!(device.region.is_none());
        assert!(device.vlans.is_empty());
        assert_eq!(
            device.interfaces,
            Some(vec!["Ethernet0".to_string(), "1".to_string()])
        );
    }

    #[test]
    fn test_device_serialization_omits_empty_optionals() {
        let device = Device::new("sw1", "10.0.0.1", "Cisco", "NX-OS", "leaf");
        let json = serde_json::to_value(&device).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert!(!obj.contains_key("region"));
        assert!(!obj.contains_key("vlans"));
        assert!(!obj.contains_key("interfaces"));

        let device = device
            .with_region("dc1")
            .with_vlans(vec![Vlan::new(10, "mgmt")]);
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["region"], "dc1");
        assert_eq!(json["vlans"][0]["id"], 10);
    }

    #[test]
    fn test_join_keys() {
        let device = Device::new("Leaf-01", "", "", "", "");
        assert_eq!(device.name_key(), "leaf-01");
        assert_eq!(device.ip_key(), None);
        let device = Device::new("x", "10.1.1.1", "", "", "");
        assert_eq!(device.ip_key(), Some("10.1.1.1"));
    }

    #[test]
    fn test_snapshot_round_trip_keeps_source_and_time() {
        let snapshot = InventorySnapshot::new(
            vec![Device::new("sw1", "10.0.0.1", "Cisco", "IOS", "core")],
            SnapshotSource::Merged,
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"source\":\"merged\""));

        let parsed: InventorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.source, SnapshotSource::Merged);
        assert_eq!(parsed.generated_at, snapshot.generated_at);
        assert_eq!(parsed.devices, snapshot.devices);
    }

    #[test]
    fn test_snapshot_with_bad_timestamp_and_no_source() {
        let parsed: InventorySnapshot =
            serde_json::from_str(r#"{"devices": [], "generated_at": "yesterday"}"#).unwrap();
        assert_eq!(parsed.source, SnapshotSource::Yaml);
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_naive_timestamp_is_accepted() {
        let ts = lenient::parse_timestamp("2024-05-01T12:30:00.123456").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T12:30:00.123456+00:00");
    }

    #[test]
    fn test_mismatch_serialization() {
        let mismatch = InventoryMismatch::new(
            MismatchCategory::RoleMismatch,
            "sw1",
            "leaf",
            "spine",
        );
        let json = serde_json::to_value(&mismatch).unwrap();
        assert_eq!(json["category"], "ROLE_MISMATCH");
        assert!(json.get("details").is_none());

        let json = serde_json::to_value(mismatch.with_details("Role mismatch for sw1")).unwrap();
        assert_eq!(json["details"], "Role mismatch for sw1");
    }
}
