//! Keyword router for `netopsctl ask`
//!
//! Maps a plain-language inventory question onto one agent tool call. Rules
//! are checked in order and the first match wins; anything unrecognised lists
//! every device.

use regex::Regex;
use serde_json::{json, Value};

/// A tool call chosen for a query
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub tool: &'static str,
    pub query_type: &'static str,
    pub arguments: Value,
}

impl Route {
    fn new(tool: &'static str, query_type: &'static str, arguments: Value) -> Self {
        Self {
            tool,
            query_type,
            arguments,
        }
    }

    /// One-line answer built from the tool's result data
    pub fn summary(&self, data: &Value) -> String {
        let count = data["count"].as_u64().unwrap_or(0);
        match self.query_type {
            "vlan_lookup" => format!(
                "Found {} device(s) on VLAN {}",
                count, self.arguments["vlan_id"]
            ),
            "vlan_table" => format!(
                "VLAN table with {} VLANs",
                data["total_vlans"].as_u64().unwrap_or(0)
            ),
            "device_info" => {
                let device = &data["device"];
                format!(
                    "Device {}: {} role, {} VLAN(s)",
                    device["name"].as_str().unwrap_or("N/A"),
                    device["role"].as_str().unwrap_or("N/A"),
                    device["vlans"].as_array().map_or(0, Vec::len)
                )
            }
            "sonic_devices" => format!("Found {} SONiC device(s)", count),
            "inventory_summary" => format!(
                "Grouped {} devices by vendor",
                data["total"].as_u64().unwrap_or(0)
            ),
            "inventory_mismatches" => {
                format!("Found {} mismatch(es) between YAML and NetBox", count)
            }
            "inventory_report" => format!(
                "Inventory report: {} devices, {} mismatches",
                data["snapshot"]["devices"].as_array().map_or(0, Vec::len),
                data["report"]["failed"].as_u64().unwrap_or(0)
            ),
            _ => format!("Found {} device(s) in inventory", count),
        }
    }
}

pub struct QueryRouter {
    vlan_id: Regex,
    device_name: Regex,
}

impl QueryRouter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            vlan_id: Regex::new(r"vlan\s+(\d+)")?,
            device_name: Regex::new(
                r"(?i)\b(sonic-\S+|nexus-\S+|edgecore-\S+|celtica-\S+|\S+-\d+)\b",
            )?,
        })
    }

    pub fn route(&self, query: &str) -> Route {
        let q = query.to_lowercase();

        if let Some(id) = self
            .vlan_id
            .captures(&q)
            .and_then(|c| c[1].parse::<u32>().ok())
        {
            return Route::new(
                "inventory_vlan_lookup",
                "vlan_lookup",
                json!({ "vlan_id": id }),
            );
        }

        if q.contains("vlan table") || q.contains("show vlan") {
            return Route::new("inventory_vlan_table", "vlan_table", json!({}));
        }

        if let Some(m) = self.device_name.captures(query) {
            return Route::new(
                "inventory_device_info",
                "device_info",
                json!({ "device_name": &m[1] }),
            );
        }

        if q.contains("list all") || q.contains("show all") {
            let query_type = if q.contains("sonic") { "sonic" } else { "all" };
            return Route::new(
                "inventory_device_info",
                "device_list",
                json!({ "query_type": query_type }),
            );
        }

        if q.contains("sonic")
            && (q.contains("leaf") || q.contains("switch") || q.contains("device"))
        {
            let mut args = json!({ "os": "sonic", "source": "merged" });
            if q.contains("leaf") {
                args["role"] = json!("leaf");
            }
            return Route::new("inventory_device_info", "sonic_devices", args);
        }

        if q.contains("group") && q.contains("vendor") {
            return Route::new(
                "inventory_group",
                "inventory_summary",
                json!({ "dimension": "vendor" }),
            );
        }

        if q.contains("mismatch") || (q.contains("yam") && q.contains("netbox")) {
            return Route::new("inventory_mismatches", "inventory_mismatches", json!({}));
        }

        if q.contains("inventory report") || (q.contains("generate") && q.contains("report")) {
            let export_format = if q.contains("html") {
                "html"
            } else if q.contains("markdown") || q.contains("md") {
                "md"
            } else if q.contains("json") {
                "json"
            } else {
                "none"
            };
            return Route::new(
                "inventory_report",
                "inventory_report",
                json!({ "export_format": export_format }),
            );
        }

        Route::new(
            "inventory_device_info",
            "device_list",
            json!({ "query_type": "all" }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(query: &str) -> Route {
        QueryRouter::new().unwrap().route(query)
    }

    #[test]
    fn test_vlan_lookup() {
        let r = route("Which devices are on VLAN 100?");
        assert_eq!(r.tool, "inventory_vlan_lookup");
        assert_eq!(r.arguments["vlan_id"], 100);
    }

    #[test]
    fn test_vlan_table() {
        assert_eq!(route("show vlan table").tool, "inventory_vlan_table");
        assert_eq!(route("print the VLAN table").tool, "inventory_vlan_table");
    }

    #[test]
    fn test_device_name() {
        let r = route("tell me about sonic-leaf-01");
        assert_eq!(r.tool, "inventory_device_info");
        assert_eq!(r.arguments["device_name"], "sonic-leaf-01");

        let r = route("info on router-7 please");
        assert_eq!(r.arguments["device_name"], "router-7");
    }

    #[test]
    fn test_list_all() {
        let r = route("list all sonic switches");
        assert_eq!(r.arguments["query_type"], "sonic");
        assert_eq!(route("show all devices").arguments["query_type"], "all");
    }

    #[test]
    fn test_sonic_leaf() {
        let r = route("Show SONiC leaf switches");
        assert_eq!(r.query_type, "sonic_devices");
        assert_eq!(r.arguments["os"], "sonic");
        assert_eq!(r.arguments["role"], "leaf");
        assert_eq!(r.arguments["source"], "merged");

        let r = route("which SONiC devices do we have");
        assert!(r.arguments.get("role").is_none());
    }

    #[test]
    fn test_group_mismatch_report() {
        assert_eq!(route("group devices by vendor").tool, "inventory_group");
        assert_eq!(route("any mismatches?").tool, "inventory_mismatches");
        assert_eq!(
            route("does yaml agree with netbox").tool,
            "inventory_mismatches"
        );

        let r = route("generate an html report");
        assert_eq!(r.tool, "inventory_report");
        assert_eq!(r.arguments["export_format"], "html");
        assert_eq!(
            route("inventory report").arguments["export_format"],
            "none"
        );
    }

    #[test]
    fn test_fallback_lists_everything() {
        let r = route("what do we have");
        assert_eq!(r.tool, "inventory_device_info");
        assert_eq!(r.arguments["query_type"], "all");
    }

    #[test]
    fn test_summaries() {
        let r = route("vlan 10");
        assert_eq!(
            r.summary(&json!({"count": 5})),
            "Found 5 device(s) on VLAN 10"
        );

        let r = route("sonic-leaf-01");
        let data = json!({"device": {"name": "sonic-leaf-01", "role": "leaf", "vlans": [1, 2]}});
        assert_eq!(r.summary(&data), "Device sonic-leaf-01: leaf role, 2 VLAN(s)");
    }
}
