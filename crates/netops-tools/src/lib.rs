//! Netops Tools - network-facing collaborators and agent tools
//!
//! - [`netbox`] loads the remote inventory, falling back to a bundled sample
//!   payload when NetBox is not configured or not reachable
//! - [`identity`] probes live devices for their hostname
//! - [`reconcile`] runs the load, merge and mismatch pipeline
//! - [`tools`] exposes inventory operations as [`netops_core::Tool`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use netops_tools::ToolRegistry;
//!
//! let registry = ToolRegistry::with_inventory_tools(Arc::new(config));
//! let executor = registry.into_executor();
//! let result = executor
//!     .execute_tool("inventory_vlan_lookup", ToolInput::new(json!({"vlan_id": 10})))
//!     .await?;
//! ```

pub mod identity;
pub mod netbox;
pub mod reconcile;
pub mod registry;
pub mod tools;

pub use identity::{verify_identity, CommandProbe, IdentityProbe};
pub use netbox::{load_remote_inventory, FallbackReason, LoadOrigin, NetboxClient, RemoteLoad};
pub use reconcile::Reconciliation;
pub use registry::{BuiltinToolExecutor, ToolRegistry};
pub use tools::inventory::InventoryTools;
