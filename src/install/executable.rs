use crate::arch::{self, ArchProvider, Uname};
use crate::artifact;
use crate::download::ReleaseSource;
use crate::download::github::GitHubClient;
use crate::error::ToolError;
use crate::install::probe::{InstalledTool, SystemProbe, VersionProbe};
use crate::install::process::{Pkill, ProcessControl};
use crate::install::utils::{is_directory_in_path, place_binary, same_file};
use crate::install::workspace::Workspace;
use crate::models::ToolDefinition;
use crate::outcome::{Outcome, SkipReason};
use crate::settings::Settings;
use crate::version::Version;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Flags for one install/upgrade pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Reinstall installed tools even when they are up to date
    pub force: bool,
    /// Decide what would happen, but touch nothing
    pub dry_run: bool,
}

/// 1-based position of a tool within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl Progress {
    pub fn single() -> Self {
        Self {
            position: 1,
            total: 1,
        }
    }
}

/// Installs, upgrades and removes single tools.
///
/// Every external effect goes through one of the seams so the decision
/// logic can run against fakes.
pub struct Installer {
    releases: Box<dyn ReleaseSource>,
    probe: Box<dyn VersionProbe>,
    processes: Box<dyn ProcessControl>,
    arch: Box<dyn ArchProvider>,
    install_path: PathBuf,
    workspace_base: PathBuf,
}

impl Installer {
    pub fn new(
        releases: Box<dyn ReleaseSource>,
        probe: Box<dyn VersionProbe>,
        processes: Box<dyn ProcessControl>,
        arch: Box<dyn ArchProvider>,
        install_path: PathBuf,
    ) -> Self {
        Self {
            releases,
            probe,
            processes,
            arch,
            install_path,
            workspace_base: std::env::temp_dir(),
        }
    }

    /// Installer wired to GitHub, `PATH`, `pkill` and `uname`
    pub fn system(settings: &Settings) -> Self {
        Self::new(
            Box::new(GitHubClient::new(settings)),
            Box::new(SystemProbe::new()),
            Box::new(Pkill::default()),
            Box::new(Uname),
            settings.install_path.clone(),
        )
    }

    /// Create scratch workspaces under `base` instead of the system temp dir
    pub fn with_workspace_base(mut self, base: PathBuf) -> Self {
        self.workspace_base = base;
        self
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    pub fn probe(&self, def: &ToolDefinition) -> Option<InstalledTool> {
        self.probe.probe(def)
    }

    pub fn latest_version(&self, def: &ToolDefinition) -> Result<Version, ToolError> {
        self.releases
            .latest_version(&def.repository)
            .map_err(|e| ToolError::RemoteVersionUnavailable(ToolError::cause(&e)))
    }

    pub(crate) fn terminate(&self, def: &ToolDefinition) {
        self.processes.terminate(&def.application_name);
    }

    /// Install or upgrade one tool
    pub fn install(
        &self,
        def: &ToolDefinition,
        options: InstallOptions,
        progress: Progress,
    ) -> Outcome {
        self.install_resolved(def, None, options, progress)
    }

    /// Like [`Self::install`], but a known `latest` version skips the
    /// release lookup
    pub fn install_resolved(
        &self,
        def: &ToolDefinition,
        latest: Option<Version>,
        options: InstallOptions,
        progress: Progress,
    ) -> Outcome {
        info!(
            tool = %def.name,
            position = progress.position,
            total = progress.total,
            force = options.force,
            dry_run = options.dry_run,
            "installing"
        );
        match self.try_install(def, latest, options) {
            Ok(outcome) => {
                info!(tool = %def.name, %outcome, "done");
                outcome
            }
            Err(err) => {
                warn!(tool = %def.name, error = %err, "install failed");
                Outcome::Failed(err)
            }
        }
    }

    fn try_install(
        &self,
        def: &ToolDefinition,
        latest: Option<Version>,
        options: InstallOptions,
    ) -> Result<Outcome, ToolError> {
        let installed = self.probe.probe(def);

        if options.force && installed.is_none() {
            return Ok(Outcome::Skipped(SkipReason::ForceRequiresInstalled));
        }

        let latest = match latest {
            Some(latest) => latest,
            None => self.latest_version(def)?,
        };
        let previous = installed.as_ref().and_then(|t| t.version.clone());

        if !options.force && installed.is_some() && previous.as_ref() == Some(&latest) {
            debug!(tool = %def.name, version = %latest, "already up to date");
            return Ok(Outcome::Skipped(SkipReason::AlreadyUpToDate));
        }

        if options.dry_run {
            let action = match (&installed, &previous) {
                _ if options.force => format!("would reinstall {} {latest}", def.name),
                (Some(_), Some(previous)) => {
                    format!("would upgrade {} {previous} -> {latest}", def.name)
                }
                (Some(_), None) => format!("would replace {} with {latest}", def.name),
                (None, _) => format!("would install {} {latest}", def.name),
            };
            return Ok(Outcome::DryRun(action));
        }

        let host = self
            .arch
            .host_arch()
            .map_err(|e| ToolError::UnsupportedArchitecture(ToolError::cause(&e)))?;
        let arch = arch::resolve(&host)?;

        let archive_name = artifact::resolve_archive_name(&def.archive_pattern, &latest, arch);
        let binary_path = artifact::resolve_binary_path(&def.binary_path_pattern, &latest, arch);
        let url = artifact::download_url(&def.repository, &latest, &archive_name);

        self.processes.terminate(&def.application_name);

        let workspace = Workspace::create_in(&self.workspace_base).map_err(|e| {
            ToolError::InstallationFailed(format!("Failed to create workspace: {e}"))
        })?;

        let binary_path = workspace.fetch(
            self.releases.as_ref(),
            &url,
            &archive_name,
            &def.application_name,
            &binary_path,
        )?;
        let located = workspace.locate(&binary_path)?;
        debug!(tool = %def.name, binary = %located.display(), "located binary");

        let target = self.replace(def, installed.as_ref(), &located)?;
        info!(tool = %def.name, path = %target.display(), version = %latest, "installed");

        if !is_directory_in_path(&self.install_path) {
            warn!(
                path = %self.install_path.display(),
                "install path is not in PATH"
            );
        }

        if options.force {
            Ok(Outcome::ForceReinstalled { version: latest })
        } else {
            Ok(Outcome::Installed {
                version: latest,
                previous,
            })
        }
    }

    /// Drop a stale copy living elsewhere, then put the new binary in place
    fn replace(
        &self,
        def: &ToolDefinition,
        installed: Option<&InstalledTool>,
        located: &Path,
    ) -> Result<PathBuf, ToolError> {
        let target = self.install_path.join(&def.application_name);

        if let Some(previous) = installed
            && previous.path.exists()
            && !same_file(&previous.path, &target)
        {
            debug!(path = %previous.path.display(), "removing previous binary");
            fs::remove_file(&previous.path).map_err(|e| {
                ToolError::InstallationFailed(format!(
                    "Failed to remove previous binary {}: {e}",
                    previous.path.display()
                ))
            })?;
        }

        place_binary(located, &self.install_path, &def.application_name)
            .map_err(|e| ToolError::InstallationFailed(ToolError::cause(&e)))
    }
}
