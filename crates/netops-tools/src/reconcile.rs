//! Load -> merge -> detect pipeline

use crate::identity::{verify_identity, IdentityProbe};
use crate::netbox::{load_remote_inventory, LoadOrigin};
use netops_core::{
    build_report, detect_mismatches, load_local_inventory, merge, InventoryMismatch,
    InventoryReport, InventorySnapshot, NetopsConfig, NetopsResult,
};
use tracing::info;

/// Both sources, their merge and the mismatches between them
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub local: InventorySnapshot,
    pub remote: InventorySnapshot,
    pub origin: LoadOrigin,
    pub merged: InventorySnapshot,
    pub mismatches: Vec<InventoryMismatch>,
}

impl Reconciliation {
    /// Load both sources and reconcile them. Only a local inventory failure
    /// is returned as an error.
    pub async fn run(config: &NetopsConfig) -> NetopsResult<Self> {
        let local = load_local_inventory(&config.inventory.path)?;
        let remote = load_remote_inventory(&config.netbox).await;

        let merged = merge(&local, &remote.snapshot);
        let mismatches = detect_mismatches(&local, &remote.snapshot);

        info!(
            local = local.len(),
            remote = remote.snapshot.len(),
            merged = merged.len(),
            mismatches = mismatches.len(),
            live = remote.origin.is_live(),
            "Reconciled inventories"
        );

        Ok(Self {
            local,
            remote: remote.snapshot,
            origin: remote.origin,
            merged,
            mismatches,
        })
    }

    /// Probe merged devices and append any identity mismatches
    pub async fn verify_identity(&mut self, enabled: bool, probe: &dyn IdentityProbe) -> usize {
        let found = verify_identity(&self.merged.devices, enabled, probe).await;
        let count = found.len();
        self.mismatches.extend(found);
        count
    }

    pub fn report(&self) -> InventoryReport {
        build_report(&self.merged, self.mismatches.clone())
    }
}
