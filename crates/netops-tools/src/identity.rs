//! Live identity verification
//!
//! Asks each device for its hostname and flags devices whose answer does not
//! resemble the inventory name. Probe failures are logged and skipped.

use crate::tools::common::execute_command;
use async_trait::async_trait;
use netops_core::{
    Device, IdentityConfig, InventoryMismatch, MismatchCategory, NetopsError, NetopsResult,
};
use tracing::debug;

/// Something that can report the hostname a device claims for itself
#[async_trait]
pub trait IdentityProbe: Send + Sync {
    async fn hostname(&self, device: &Device) -> NetopsResult<String>;
}

/// Runs the configured command (ssh by default) and reads the hostname from
/// the first non-empty stdout line
pub struct CommandProbe {
    config: IdentityConfig,
}

impl CommandProbe {
    pub fn new(config: IdentityConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProbe for CommandProbe {
    async fn hostname(&self, device: &Device) -> NetopsResult<String> {
        let argv = self.config.argv_for(&device.name, &device.ip);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| NetopsError::config("identity.command cannot be empty"))?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = execute_command(program, &args, self.config.timeout_secs)
            .await
            .map_err(NetopsError::tool)?;

        if !output.success {
            return Err(NetopsError::tool(format!(
                "{} exited with {}: {}",
                program,
                output.exit_code,
                output.stderr.trim()
            )));
        }

        output
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| NetopsError::tool(format!("{} printed no hostname", program)))
    }
}

/// Compare live hostnames against inventory names.
///
/// Does nothing when `enabled` is false. Devices without an IP are skipped,
/// devices are probed one at a time, and an empty hostname is not a mismatch.
pub async fn verify_identity(
    devices: &[Device],
    enabled: bool,
    probe: &dyn IdentityProbe,
) -> Vec<InventoryMismatch> {
    if !enabled {
        return Vec::new();
    }

    let mut mismatches = Vec::new();
    for device in devices.iter().filter(|d| !d.ip.is_empty()) {
        let hostname = match probe.hostname(device).await {
            Ok(hostname) => hostname.trim().to_lowercase(),
            Err(e) => {
                debug!(device = %device.name, error = %e, "Identity verification failed");
                continue;
            }
        };

        let name = device.name.to_lowercase();
        if hostname.is_empty() || hostname.contains(&name) || name.contains(&hostname) {
            continue;
        }

        mismatches.push(
            InventoryMismatch::new(
                MismatchCategory::IdentityMismatch,
                device.name.as_str(),
                device.name.as_str(),
                hostname.as_str(),
            )
            .with_details(format!(
                "Device identity verification: expected hostname matching {}, got {}",
                device.name, hostname
            )),
        );
    }
    mismatches
}
