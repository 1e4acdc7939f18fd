// Netops configuration
//
// One YAML file configures the whole toolkit:
// - where the local inventory lives
// - how to reach NetBox (and which fixture to fall back to)
// - whether and how to probe live devices for their hostname
//
// `${VAR}` placeholders in string values are expanded from the environment
// after the file is read. Command-line flags override file values.

use crate::error::{NetopsError, NetopsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Token value shipped in sample configs; treated the same as no token
pub const PLACEHOLDER_TOKEN: &str = "your-api-token-here";

pub const DEFAULT_INVENTORY_PATH: &str = "data/devices.yaml";

pub const DEFAULT_IDENTITY_COMMAND: &str = "ssh -o BatchMode=yes -o ConnectTimeout=5 {ip} hostname";

/// Top-level configuration
///
/// Example:
/// ```yaml
/// inventory:
///   path: data/devices.yaml
/// netbox:
///   url: https://netbox.example.com
///   token: ${NETBOX_TOKEN}
///   timeout_secs: 10
/// identity:
///   enabled: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetopsConfig {
    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub netbox: NetboxConfig,

    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_inventory_path")]
    pub path: PathBuf,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            path: default_inventory_path(),
        }
    }
}

fn default_inventory_path() -> PathBuf {
    PathBuf::from(DEFAULT_INVENTORY_PATH)
}

/// NetBox connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetboxConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Replaces the bundled sample payload used when NetBox is unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,

    /// Upper bound on `next` links followed per load
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for NetboxConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_timeout_secs(),
            fixture: None,
            max_pages: default_max_pages(),
        }
    }
}

impl NetboxConfig {
    /// Whether a live request should be attempted at all. Missing, empty,
    /// placeholder and unexpanded `${VAR}` values all count as absent.
    pub fn has_credentials(&self) -> bool {
        let usable = |value: Option<&str>| {
            value
                .map(str::trim)
                .map_or(false, |v| !v.is_empty() && !v.contains("${"))
        };
        let token = self.token.as_deref();
        usable(self.url.as_deref())
            && usable(token)
            && token.map(str::trim) != Some(PLACEHOLDER_TOKEN)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_pages() -> usize {
    50
}

/// Live hostname probing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Whitespace-separated argv; `{ip}` and `{name}` are substituted per device
    #[serde(default = "default_identity_command")]
    pub command: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_identity_command(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl IdentityConfig {
    pub fn argv_for(&self, name: &str, ip: &str) -> Vec<String> {
        self.command
            .split_whitespace()
            .map(|part| part.replace("{ip}", ip).replace("{name}", name))
            .collect()
    }
}

fn default_identity_command() -> String {
    DEFAULT_IDENTITY_COMMAND.to_string()
}

impl NetopsConfig {
    pub fn from_yaml(content: &str) -> NetopsResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let deserializer = serde_yaml::Deserializer::from_str(content);
        let mut config: NetopsConfig = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| NetopsError::config(format!("at `{}`: {}", e.path(), e.inner())))?;
        config.expand_env_vars();
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. The file must exist.
    pub fn load(path: impl AsRef<Path>) -> NetopsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NetopsError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Expand `${VAR}` references in every string setting
    pub fn expand_env_vars(&mut self) {
        self.inventory.path = PathBuf::from(expand_env_var(&self.inventory.path.to_string_lossy()));
        self.netbox.url = self.netbox.url.as_deref().map(expand_env_var);
        self.netbox.token = self.netbox.token.as_deref().map(expand_env_var);
        self.netbox.fixture = self
            .netbox
            .fixture
            .as_ref()
            .map(|p| PathBuf::from(expand_env_var(&p.to_string_lossy())));
        self.identity.command = expand_env_var(&self.identity.command);
    }

    pub fn validate(&self) -> NetopsResult<()> {
        if self.netbox.timeout_secs == 0 {
            return Err(NetopsError::config("netbox.timeout_secs must be greater than 0"));
        }
        if self.netbox.max_pages == 0 {
            return Err(NetopsError::config("netbox.max_pages must be greater than 0"));
        }
        if self.identity.timeout_secs == 0 {
            return Err(NetopsError::config("identity.timeout_secs must be greater than 0"));
        }
        if self.identity.command.split_whitespace().next().is_none() {
            return Err(NetopsError::config("identity.command cannot be empty"));
        }
        Ok(())
    }
}

/// Replace `${VAR}` with the variable's value; unset variables are left as-is
pub fn expand_env_var(value: &str) -> String {
    let Ok(re) = regex::Regex::new(r"\$\{([^}]+)\}") else {
        return value.to_string();
    };

    let mut result = value.to_string();
    for cap in re.captures_iter(value) {
        if let Ok(var_value) = std::env::var(&cap[1]) {
            result = result.replace(&cap[0], &var_value);
        }
    }
    result
}
