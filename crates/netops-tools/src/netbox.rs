//! NetBox remote inventory loader
//!
//! Fetches `/api/dcim/devices/`, follows pagination and maps each record onto
//! the canonical [`Device`] vocabulary. Remote trouble never surfaces as an
//! error: missing credentials or a failed request fall back to a sample
//! payload, and the returned [`LoadOrigin`] says which one happened.
//!
//! ## Payload shape
//!
//! Both the API body (`results`) and the flattened sample layout (`devices`)
//! are accepted. Every field may be a plain string or a NetBox nested object:
//!
//! ```json
//! {"name": "leaf1", "role": {"name": "Leaf"}, "primary_ip": {"address": "10.0.0.1/24"}}
//! ```

use netops_core::inventory::normalize::{normalize_os, normalize_role, normalize_vendor};
use netops_core::{Device, InventorySnapshot, NetboxConfig, NetopsError, NetopsResult, SnapshotSource};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sample payload compiled into the binary
pub const BUNDLED_FIXTURE: &str = include_str!("../fixtures/netbox_sample.json");

const DEVICES_ENDPOINT: &str = "/api/dcim/devices/";

/// Why the fixture was used instead of live data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// URL or token missing, empty, or the placeholder value
    MissingCredentials,
    RequestFailed { message: String },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MissingCredentials => write!(f, "NetBox credentials not configured"),
            FallbackReason::RequestFailed { message } => {
                write!(f, "NetBox request failed: {}", message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum LoadOrigin {
    Live,
    Fixture { reason: FallbackReason },
}

impl LoadOrigin {
    pub fn is_live(&self) -> bool {
        matches!(self, LoadOrigin::Live)
    }
}

/// Result of a remote load. The snapshot is tagged `netbox` either way.
#[derive(Debug, Clone)]
pub struct RemoteLoad {
    pub snapshot: InventorySnapshot,
    pub origin: LoadOrigin,
}

/// Load the remote inventory, degrading to the fixture on any failure
pub async fn load_remote_inventory(config: &NetboxConfig) -> RemoteLoad {
    if !config.has_credentials() {
        info!("NetBox credentials not provided, loading sample payload");
        return load_fixture(config, FallbackReason::MissingCredentials);
    }

    match fetch_live(config).await {
        Ok(devices) => {
            info!(devices = devices.len(), "Fetched devices from NetBox");
            RemoteLoad {
                snapshot: InventorySnapshot::new(devices, SnapshotSource::Netbox),
                origin: LoadOrigin::Live,
            }
        }
        Err(e) => {
            warn!(error = %e, "NetBox unavailable, falling back to sample payload");
            load_fixture(
                config,
                FallbackReason::RequestFailed {
                    message: e.to_string(),
                },
            )
        }
    }
}

async fn fetch_live(config: &NetboxConfig) -> NetopsResult<Vec<Device>> {
    let url = config.url.as_deref().unwrap_or_default();
    let token = config.token.as_deref().unwrap_or_default();
    let client = NetboxClient::new(url, token, config.timeout_secs)?;
    client.fetch_devices(config.max_pages).await
}

fn load_fixture(config: &NetboxConfig, reason: FallbackReason) -> RemoteLoad {
    let devices = match &config.fixture {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => parse_fixture(&content, &path.display().to_string()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read NetBox fixture");
                Vec::new()
            }
        },
        None => parse_fixture(BUNDLED_FIXTURE, "bundled fixture"),
    };

    debug!(devices = devices.len(), reason = %reason, "Loaded NetBox fixture");
    RemoteLoad {
        snapshot: InventorySnapshot::new(devices, SnapshotSource::Netbox),
        origin: LoadOrigin::Fixture { reason },
    }
}

fn parse_fixture(content: &str, label: &str) -> Vec<Device> {
    match parse_payload(content) {
        Ok(page) => page.devices,
        Err(e) => {
            warn!(fixture = %label, error = %e, "Invalid NetBox fixture");
            Vec::new()
        }
    }
}

/// One decoded page of devices
#[derive(Debug, Clone, Default)]
pub struct DevicePage {
    pub devices: Vec<Device>,
    pub next: Option<String>,
    pub count: Option<u64>,
}

/// Decode a NetBox response body (or fixture) into canonical devices
pub fn parse_payload(content: &str) -> NetopsResult<DevicePage> {
    let payload: NetboxPayload = serde_json::from_str(content)?;
    let records = payload.devices.or(payload.results).unwrap_or_default();
    Ok(DevicePage {
        devices: records
            .into_iter()
            .filter_map(|entry| match entry {
                RecordEntry::Device(record) => Some(record.into_device()),
                RecordEntry::Other(_) => None,
            })
            .collect(),
        next: payload.next.filter(|n| !n.is_empty()),
        count: payload.count,
    })
}

/// Thin NetBox REST client
pub struct NetboxClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl NetboxClient {
    pub fn new(base_url: &str, token: &str, timeout_secs: u64) -> NetopsResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|e| NetopsError::config(format!("Invalid NetBox token: {}", e)))?,
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| NetopsError::http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// Fetch every device, following `next` links for at most `max_pages` pages
    pub async fn fetch_devices(&self, max_pages: usize) -> NetopsResult<Vec<Device>> {
        let mut url = format!("{}{}", self.base_url, DEVICES_ENDPOINT);
        let mut devices = Vec::new();

        for page_no in 1..=max_pages.max(1) {
            debug!(url = %url, page = page_no, "Fetching NetBox devices");
            let page = self.fetch_page(&url).await?;
            if page_no == 1 {
                if let Some(count) = page.count {
                    debug!(count, "NetBox reports device count");
                }
            }
            devices.extend(page.devices);

            match page.next {
                Some(next) if page_no < max_pages => url = next,
                Some(_) => {
                    warn!(max_pages, "NetBox pagination limit reached, result truncated");
                    break;
                }
                None => break,
            }
        }

        Ok(devices)
    }

    async fn fetch_page(&self, url: &str) -> NetopsResult<DevicePage> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                NetopsError::Timeout(self.timeout_secs)
            } else {
                NetopsError::http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetopsError::http(format!("NetBox returned HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NetopsError::http(format!("Failed to read NetBox response: {}", e)))?;
        parse_payload(&body)
    }
}

#[derive(Debug, Default, Deserialize)]
struct NetboxPayload {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Option<Vec<RecordEntry>>,
    #[serde(default)]
    devices: Option<Vec<RecordEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordEntry {
    Device(Box<NetboxDevice>),
    Other(IgnoredAny),
}

/// A string or a nested object carrying one of the usual label keys
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldRef {
    Text(String),
    Nested(Box<NestedRef>),
    Other(IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
struct NestedRef {
    #[serde(default)]
    name: Option<FieldRef>,
    #[serde(default)]
    model: Option<FieldRef>,
    #[serde(default)]
    display: Option<FieldRef>,
    #[serde(default)]
    address: Option<FieldRef>,
    #[serde(default)]
    manufacturer: Option<FieldRef>,
}

impl FieldRef {
    fn text(&self) -> Option<&str> {
        let value = match self {
            FieldRef::Text(s) => Some(s.as_str()),
            FieldRef::Nested(n) => [&n.name, &n.model, &n.display, &n.address]
                .into_iter()
                .flatten()
                .find_map(FieldRef::text),
            FieldRef::Other(_) => None,
        };
        value.filter(|s| !s.trim().is_empty())
    }

    fn manufacturer(&self) -> Option<&str> {
        match self {
            FieldRef::Nested(n) => n.manufacturer.as_ref().and_then(FieldRef::text),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct NetboxDevice {
    #[serde(default)]
    name: Option<FieldRef>,
    #[serde(default)]
    manufacturer: Option<FieldRef>,
    #[serde(default)]
    vendor: Option<FieldRef>,
    #[serde(default)]
    device_type: Option<FieldRef>,
    #[serde(default)]
    platform: Option<FieldRef>,
    #[serde(default)]
    role: Option<FieldRef>,
    #[serde(default)]
    device_role: Option<FieldRef>,
    #[serde(default)]
    site: Option<FieldRef>,
    #[serde(default)]
    region: Option<FieldRef>,
    #[serde(default)]
    primary_ip: Option<FieldRef>,
}

fn text_of(field: &Option<FieldRef>) -> Option<&str> {
    field.as_ref().and_then(FieldRef::text)
}

impl NetboxDevice {
    fn into_device(self) -> Device {
        let vendor = text_of(&self.manufacturer)
            .or_else(|| text_of(&self.vendor))
            .or_else(|| self.device_type.as_ref().and_then(FieldRef::manufacturer))
            .unwrap_or_default();
        let os = text_of(&self.device_type)
            .or_else(|| text_of(&self.platform))
            .unwrap_or_default();
        let role = text_of(&self.role)
            .or_else(|| text_of(&self.device_role))
            .unwrap_or_default();
        let ip = text_of(&self.primary_ip)
            .and_then(|addr| addr.split('/').next())
            .unwrap_or_default();

        Device {
            name: text_of(&self.name).unwrap_or_default().to_string(),
            ip: ip.trim().to_string(),
            vendor: normalize_vendor(vendor),
            os: normalize_os(os),
            role: normalize_role(role),
            region: text_of(&self.site)
                .or_else(|| text_of(&self.region))
                .map(str::to_string),
            vlans: Vec::new(),
            interfaces: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn fixture_len() -> usize {
        parse_payload(BUNDLED_FIXTURE).unwrap().devices.len()
    }

    /// Minimal HTTP/1.1 responder: answers each request with the body chosen
    /// by `respond` from the request line
    async fn serve<F>(respond: F) -> String
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let request_line = request.lines().next().unwrap_or_default().to_string();
                let (status, body) = respond(&request_line);
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn config(url: &str, token: &str) -> NetboxConfig {
        NetboxConfig {
            url: Some(url.to_string()),
            token: Some(token.to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_flat_fixture() {
        let page = parse_payload(BUNDLED_FIXTURE).unwrap();
        assert_eq!(page.devices.len(), 6);
        let leaf = &page.devices[0];
        assert_eq!(leaf.name, "sonic-leaf-01");
        assert_eq!(leaf.vendor, "EdgeCore");
        assert_eq!(leaf.os, "SONiC");
        assert_eq!(leaf.role, "leaf");
        assert_eq!(leaf.ip, "10.1.1.1");
        assert_eq!(leaf.region.as_deref(), Some("dc1"));
        assert!(leaf.vlans.is_empty());
    }

    #[test]
    fn test_parse_nested_api_records() {
        let body = r#"{
            "count": 2,
            "next": null,
            "results": [
                {
                    "name": "leaf1",
                    "device_type": {"model": "Nexus 93180", "manufacturer": {"name": "Cisco"}},
                    "device_role": {"name": "Leaf"},
                    "site": {"name": "DC-East"},
                    "primary_ip": {"address": "192.0.2.10/24"}
                },
                {
                    "name": null,
                    "platform": {"name": "junos"},
                    "role": 7,
                    "primary_ip": null
                },
                "garbage"
            ]
        }"#;

        let page = parse_payload(body).unwrap();
        assert_eq!(page.devices.len(), 2);
        let leaf = &page.devices[0];
        assert_eq!(leaf.vendor, "Cisco");
        assert_eq!(leaf.os, "NX-OS");
        assert_eq!(leaf.role, "leaf");
        assert_eq!(leaf.ip, "192.0.2.10");
        assert_eq!(leaf.region.as_deref(), Some("DC-East"));

        let unnamed = &page.devices[1];
        assert_eq!(unnamed.name, "");
        assert_eq!(unnamed.os, "Junos");
        assert_eq!(unnamed.role, "unknown");
        assert_eq!(unnamed.vendor, "Unknown");
        assert_eq!(unnamed.ip, "");
    }

    #[tokio::test]
    async fn test_empty_token_uses_fixture() {
        let load = load_remote_inventory(&config("http://netbox.local", "")).await;
        assert_eq!(load.snapshot.source, SnapshotSource::Netbox);
        assert_eq!(load.snapshot.len(), fixture_len());
        assert_eq!(
            load.origin,
            LoadOrigin::Fixture {
                reason: FallbackReason::MissingCredentials
            }
        );
    }

    #[tokio::test]
    async fn test_placeholder_token_uses_fixture() {
        let load =
            load_remote_inventory(&config("http://netbox.local", "your-api-token-here")).await;
        assert!(!load.origin.is_live());
        assert_eq!(load.snapshot.len(), fixture_len());
    }

    #[tokio::test]
    async fn test_connection_refused_falls_back() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let load = load_remote_inventory(&config(&format!("http://{}", addr), "token")).await;
        assert!(matches!(
            load.origin,
            LoadOrigin::Fixture {
                reason: FallbackReason::RequestFailed { .. }
            }
        ));
        assert_eq!(load.snapshot.len(), fixture_len());
    }

    #[tokio::test]
    async fn test_slow_server_times_out_and_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                    let body = r#"{"count": 0, "next": null, "results": []}"#;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        let mut cfg = config(&format!("http://{}", addr), "token");
        cfg.timeout_secs = 1;

        let started = std::time::Instant::now();
        let load = load_remote_inventory(&cfg).await;
        assert!(started.elapsed() < std::time::Duration::from_secs(3));

        match load.origin {
            LoadOrigin::Fixture {
                reason: FallbackReason::RequestFailed { message },
            } => assert!(message.contains("Timeout after 1s"), "{message}"),
            other => panic!("unexpected origin: {other:?}"),
        }
        assert_eq!(load.snapshot.len(), fixture_len());
    }

    #[tokio::test]
    async fn test_http_error_falls_back() {
        let url = serve(|_| (500, "{}".to_string())).await;
        let load = load_remote_inventory(&config(&url, "token")).await;
        assert!(!load.origin.is_live());
        assert_eq!(load.snapshot.len(), fixture_len());
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let url = serve(|_| (200, "<html>not json</html>".to_string())).await;
        let load = load_remote_inventory(&config(&url, "token")).await;
        assert!(!load.origin.is_live());
    }

    #[tokio::test]
    async fn test_live_load_follows_pagination() {
        let base = std::sync::Arc::new(std::sync::Mutex::new(String::new()));
        let base_for_server = base.clone();
        let url = serve(move |request_line| {
            let base = base_for_server.lock().unwrap().clone();
            if request_line.contains("offset=1") {
                (
                    200,
                    r#"{"count": 2, "next": null, "results": [{"name": "b", "role": "spine"}]}"#
                        .to_string(),
                )
            } else {
                (
                    200,
                    format!(
                        r#"{{"count": 2, "next": "{}/api/dcim/devices/?offset=1", "results": [{{"name": "a", "role": "leaf"}}]}}"#,
                        base
                    ),
                )
            }
        })
        .await;
        *base.lock().unwrap() = url.clone();

        let load = load_remote_inventory(&config(&url, "token")).await;
        assert_eq!(load.origin, LoadOrigin::Live);
        let names: Vec<&str> = load.snapshot.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let mut limited = config(&url, "token");
        limited.max_pages = 1;
        let load = load_remote_inventory(&limited).await;
        assert_eq!(load.snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_fixture_override_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cfg = config("", "");
        cfg.fixture = Some(dir.path().join("missing.json"));

        let load = load_remote_inventory(&cfg).await;
        assert!(load.snapshot.is_empty());
        assert_eq!(load.snapshot.source, SnapshotSource::Netbox);
    }

    #[tokio::test]
    async fn test_fixture_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("netbox.json");
        std::fs::write(&path, r#"{"results": [{"name": "only-one"}]}"#).unwrap();
        let mut cfg = config("", "");
        cfg.fixture = Some(path);

        let load = load_remote_inventory(&cfg).await;
        assert_eq!(load.snapshot.len(), 1);
        assert_eq!(load.snapshot.devices[0].name, "only-one");
    }
}
