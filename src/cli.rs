use crate::bulk::Orchestrator;
use crate::catalog::{self, Catalog};
use crate::install::{InstallOptions, Installer, Progress, process};
use crate::report;
use crate::settings::{self, Settings, SettingsOverrides};
use crate::status::{catalog_states, installation_state};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Install and upgrade tools from GitHub release binaries",
    long_about = None
)]
pub struct Args {
    /// Tool catalog file (defaults to ~/.config/ghbin/tools.toml)
    #[arg(short, long, global = true, env = "GHBIN_CONFIG")]
    pub config: Option<PathBuf>,
    /// Directory binaries are installed into
    #[arg(long, global = true, env = "GHBIN_INSTALL_PATH")]
    pub install_path: Option<PathBuf>,
    /// Token for GitHub API requests (falls back to GH_TOKEN)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
    /// Network timeout in seconds
    #[arg(long, global = true, env = "GHBIN_TIMEOUT")]
    pub timeout: Option<u64>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install or upgrade tools
    Install {
        /// Tool names from the catalog
        tools: Vec<String>,
        /// Install every tool in the catalog
        #[arg(long, conflicts_with = "tools")]
        all: bool,
        /// Reinstall tools that are already up to date
        #[arg(long)]
        force: bool,
        /// Show what would happen without changing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Upgrade installed tools that are behind their latest release
    Upgrade {
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove installed tools
    Uninstall {
        tools: Vec<String>,
        /// Remove every installed catalog tool
        #[arg(long, conflicts_with = "tools")]
        all: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Show every catalog tool with its installed and latest version
    List,
    /// Compare installed and latest versions
    Status {
        tools: Vec<String>,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Install { .. } | Commands::Upgrade { .. } | Commands::Uninstall { .. }
        )
    }
}

/// Run one command. `Ok(false)` means at least one tool failed.
pub fn run(args: Args) -> Result<bool> {
    let catalog_path = match args.config {
        Some(path) => path,
        None => settings::default_catalog_path()
            .context("Could not determine the config directory; pass --config")?,
    };
    let file = catalog::load(&catalog_path)?;
    debug!(path = %catalog_path.display(), tools = file.catalog.len(), "loaded catalog");

    let overrides = SettingsOverrides {
        install_path: args.install_path,
        timeout_secs: args.timeout,
        github_token: args
            .github_token
            .or_else(|| std::env::var("GH_TOKEN").ok()),
    };
    let settings = Settings::resolve(&overrides, &file.settings);

    if args.command.mutates() {
        check_required_utilities()?;
    }

    let catalog = file.catalog;
    let installer = Installer::system(&settings);
    let orchestrator = Orchestrator::new(&catalog, &installer);

    let summary = match args.command {
        Commands::Install {
            tools,
            all,
            force,
            dry_run,
        } => {
            let options = InstallOptions { force, dry_run };
            if all {
                orchestrator.install_all(options, print_progress)
            } else {
                check_known(&catalog, &tools)?;
                orchestrator.install(&tools, options, print_progress)
            }
        }
        Commands::Upgrade { dry_run } => orchestrator.upgrade_installed(dry_run, print_progress),
        Commands::Uninstall {
            tools,
            all,
            dry_run,
        } => {
            if all {
                orchestrator.uninstall_all(dry_run, print_progress)
            } else {
                check_known(&catalog, &tools)?;
                orchestrator.uninstall(&tools, dry_run, print_progress)
            }
        }
        Commands::List => {
            let rows: Vec<_> = catalog
                .entries()
                .iter()
                .map(|entry| {
                    let state = entry
                        .definition
                        .as_ref()
                        .ok()
                        .map(|def| installation_state(&installer, def));
                    (entry, state)
                })
                .collect();
            print!("{}", report::render_list(&rows));
            return Ok(true);
        }
        Commands::Status { tools } => {
            let names = if tools.is_empty() {
                catalog.names()
            } else {
                check_known(&catalog, &tools)?;
                tools
            };
            let rows = catalog_states(&installer, &catalog, &names);
            print!("{}", report::render_status(&rows));
            return Ok(rows.iter().all(|(_, state)| state.is_ok()));
        }
    };

    print!("{}", report::render_summary(&summary));
    Ok(!summary.has_failures())
}

fn print_progress(name: &str, progress: Progress) {
    println!("{}", report::progress_line(name, progress));
}

/// Named tools must exist in the catalog before anything runs
fn check_known(catalog: &Catalog, tools: &[String]) -> Result<()> {
    if tools.is_empty() {
        return Err(anyhow::anyhow!("No tools given; pass tool names or --all"));
    }
    let unknown: Vec<&str> = tools
        .iter()
        .filter(|name| !catalog.contains(name))
        .map(String::as_str)
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Unknown tool(s): {}. Available: {}",
            unknown.join(", "),
            catalog.names().join(", ")
        ))
    }
}

fn check_required_utilities() -> Result<()> {
    let missing: Vec<&str> = std::iter::once("uname")
        .chain(process::REQUIRED_UTILITIES.iter().copied())
        .filter(|tool| which::which(tool).is_err())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Required utilities not found in PATH: {}",
            missing.join(", ")
        ))
    }
}
