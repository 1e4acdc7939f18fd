//! Name / IP lookup over a device list
//!
//! Matching always tries the lower-cased name first and only then the IP, so
//! merge and mismatch detection pair devices the same way.

use super::model::Device;
use std::collections::HashMap;

pub(crate) struct DeviceIndex<'a> {
    devices: &'a [Device],
    by_name: HashMap<String, usize>,
    by_ip: HashMap<&'a str, usize>,
}

impl<'a> DeviceIndex<'a> {
    /// Later duplicates of a name or IP replace earlier ones
    pub fn new(devices: &'a [Device]) -> Self {
        let mut by_name = HashMap::with_capacity(devices.len());
        let mut by_ip = HashMap::with_capacity(devices.len());
        for (idx, device) in devices.iter().enumerate() {
            by_name.insert(device.name_key(), idx);
            if let Some(ip) = device.ip_key() {
                by_ip.insert(ip, idx);
            }
        }
        Self {
            devices,
            by_name,
            by_ip,
        }
    }

    /// Position of the counterpart of `device`, by name then by IP
    pub fn position(&self, device: &Device) -> Option<usize> {
        self.by_name
            .get(&device.name_key())
            .or_else(|| device.ip_key().and_then(|ip| self.by_ip.get(ip)))
            .copied()
    }

    pub fn find(&self, device: &Device) -> Option<&'a Device> {
        self.position(device).map(|idx| &self.devices[idx])
    }
}
