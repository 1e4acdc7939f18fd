use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use netops_core::NetopsConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::commands;
use crate::commands::completion::Shell;
use crate::commands::get::GetResource;

/// netops CLI - kubectl-style network inventory reconciliation
#[derive(Parser, Debug)]
#[command(name = "netopsctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(long, short = 'c', global = true, env = "NETOPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Local device inventory (overrides inventory.path)
    #[arg(long, short = 'i', global = true, env = "NETOPS_INVENTORY")]
    pub inventory: Option<PathBuf>,

    /// NetBox base URL (overrides netbox.url)
    #[arg(long, global = true, env = "NETBOX_URL")]
    pub netbox_url: Option<String>,

    /// NetBox API token (overrides netbox.token)
    #[arg(long, global = true, env = "NETBOX_TOKEN", hide_env_values = true)]
    pub netbox_token: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get inventory resources (verb-first: get devices, get vlans 100)
    Get {
        #[command(subcommand)]
        resource: GetResource,
    },

    /// Group devices by an attribute (vendor, role, os, region)
    Group {
        /// Grouping dimension
        dimension: String,

        /// Snapshot to group (local, netbox, merged)
        #[arg(long, default_value = "merged")]
        source: String,

        /// Output format (json, yaml, table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Show mismatches between the local inventory and NetBox
    Diff {
        /// Output format (json, yaml, table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Show the merged inventory
    Merge {
        /// Output format (json, yaml, name, table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Generate an inventory report
    Report {
        /// Output format (text, json, markdown, html)
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Probe devices for their live hostname
        #[arg(long)]
        verify_identity: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,
    },

    /// Ask an inventory question in plain words
    Ask {
        /// Query, e.g. "which devices are on vlan 100"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// List the registered agent tools
    Tools {
        /// Output format (json, yaml, name, table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub async fn execute(self) -> anyhow::Result<()> {
        // Completions never need configuration
        if let Commands::Completion { shell } = &self.command {
            return commands::completion::execute(*shell);
        }

        let config = Arc::new(self.load_config()?);

        match self.command {
            Commands::Get { resource } => commands::get::execute(resource, &config).await,
            Commands::Group {
                dimension,
                source,
                output,
            } => commands::group::execute(&config, &dimension, &source, &output).await,
            Commands::Diff { output } => commands::diff::execute(&config, &output).await,
            Commands::Merge { output } => commands::merge::execute(&config, &output).await,
            Commands::Report {
                output,
                verify_identity,
                save,
            } => {
                commands::report::execute(&config, &output, verify_identity, save.as_deref()).await
            }
            Commands::Ask { query, output } => {
                commands::ask::execute(config, &query.join(" "), &output).await
            }
            Commands::Tools { output } => commands::tools::execute(config, &output),
            Commands::Completion { shell } => commands::completion::execute(shell),
        }
    }

    /// Config file (when given) with command-line overrides applied
    fn load_config(&self) -> anyhow::Result<NetopsConfig> {
        let mut config = match &self.config {
            Some(path) => NetopsConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => NetopsConfig::default(),
        };

        if let Some(path) = &self.inventory {
            config.inventory.path = path.clone();
        }
        if let Some(url) = &self.netbox_url {
            config.netbox.url = Some(url.clone());
        }
        if let Some(token) = &self.netbox_token {
            config.netbox.token = Some(token.clone());
        }

        debug!(
            inventory = %config.inventory.path.display(),
            netbox = config.netbox.has_credentials(),
            "Resolved configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let cli = Cli::parse_from([
            "netopsctl",
            "--inventory",
            "/tmp/devices.yaml",
            "--netbox-url",
            "https://netbox.example.com",
            "--netbox-token",
            "secret",
            "diff",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.inventory.path, PathBuf::from("/tmp/devices.yaml"));
        assert_eq!(config.netbox.url.as_deref(), Some("https://netbox.example.com"));
        assert!(config.netbox.has_credentials());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = Cli::parse_from(["netopsctl", "--config", "/nonexistent/netops.yaml", "diff"]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::parse_from(["netopsctl", "ask", "show", "vlan", "table"]);
        match cli.command {
            Commands::Ask { query, .. } => assert_eq!(query.join(" "), "show vlan table"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
