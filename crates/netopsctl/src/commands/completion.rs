//! Shell completion scripts
//!
//! - netopsctl completion bash > /etc/bash_completion.d/netopsctl
//! - netopsctl completion zsh  > ~/.zsh/completion/_netopsctl
//! - netopsctl completion fish > ~/.config/fish/completions/netopsctl.fish

use anyhow::Result;
use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell as ClapShell};
use std::io;

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

impl From<Shell> for ClapShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::Powershell => ClapShell::PowerShell,
            Shell::Elvish => ClapShell::Elvish,
        }
    }
}

/// Where to put the generated script
fn install_hint(shell: Shell) -> &'static [&'static str] {
    match shell {
        Shell::Bash => &[
            "netopsctl completion bash > /etc/bash_completion.d/netopsctl",
            "or add to ~/.bashrc: source <(netopsctl completion bash)",
        ],
        Shell::Zsh => &[
            "netopsctl completion zsh > ~/.zsh/completion/_netopsctl",
            "then run 'compinit' to load completions",
        ],
        Shell::Fish => &["netopsctl completion fish > ~/.config/fish/completions/netopsctl.fish"],
        Shell::Powershell => &[
            "netopsctl completion powershell > netopsctl.ps1",
            "then add '. ./netopsctl.ps1' to your PowerShell profile",
        ],
        Shell::Elvish => &["netopsctl completion elvish > ~/.elvish/lib/netopsctl.elv"],
    }
}

/// Print the completion script on stdout and install hints on stderr
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(ClapShell::from(shell), &mut cmd, name, &mut io::stdout());

    eprintln!();
    eprintln!("# Installation:");
    for line in install_hint(shell) {
        eprintln!("#    {}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_conversion() {
        assert!(matches!(ClapShell::from(Shell::Bash), ClapShell::Bash));
        assert!(matches!(ClapShell::from(Shell::Powershell), ClapShell::PowerShell));
    }

    #[test]
    fn test_every_shell_has_a_hint() {
        for shell in Shell::value_variants() {
            assert!(!install_hint(*shell).is_empty());
        }
    }
}
