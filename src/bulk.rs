use crate::catalog::Catalog;
use crate::install::{InstallOptions, Installer, Progress};
use crate::models::ToolDefinition;
use crate::outcome::{Outcome, RunSummary};
use crate::status::installation_state;
use crate::version::Version;
use tracing::{debug, info};

/// Runs the installer over several catalog tools, one at a time, in order.
///
/// A failing tool is recorded in the summary and the next tool is processed.
pub struct Orchestrator<'a> {
    catalog: &'a Catalog,
    installer: &'a Installer,
}

impl<'a> Orchestrator<'a> {
    pub fn new(catalog: &'a Catalog, installer: &'a Installer) -> Self {
        Self { catalog, installer }
    }

    /// Install or upgrade the named tools
    pub fn install<F>(&self, names: &[String], options: InstallOptions, observer: F) -> RunSummary
    where
        F: FnMut(&str, Progress),
    {
        self.run(names, observer, |def, progress| {
            self.installer.install(def, options, progress)
        })
    }

    /// Install or upgrade every catalog tool
    pub fn install_all<F>(&self, options: InstallOptions, observer: F) -> RunSummary
    where
        F: FnMut(&str, Progress),
    {
        self.install(&self.catalog.names(), options, observer)
    }

    /// Valid catalog tools that are installed and behind their latest release.
    /// Tools whose latest release cannot be determined are left out.
    pub fn outdated(&self) -> Vec<String> {
        self.outdated_with_latest()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    fn outdated_with_latest(&self) -> Vec<(String, Version)> {
        self.catalog
            .definitions()
            .filter_map(|def| {
                let state = installation_state(self.installer, def);
                match &state.latest {
                    Ok(latest) if state.is_outdated() => Some((def.name.clone(), latest.clone())),
                    Ok(_) => None,
                    Err(err) => {
                        debug!(tool = %def.name, error = %err, "skipping upgrade check");
                        None
                    }
                }
            })
            .collect()
    }

    /// Upgrade only the tools reported by [`Self::outdated`].
    /// The latest version found by the check is reused for the install.
    pub fn upgrade_installed<F>(&self, dry_run: bool, observer: F) -> RunSummary
    where
        F: FnMut(&str, Progress),
    {
        let outdated = self.outdated_with_latest();
        info!(count = outdated.len(), "tools with updates");
        let options = InstallOptions {
            force: false,
            dry_run,
        };
        let names: Vec<String> = outdated.iter().map(|(name, _)| name.clone()).collect();
        self.run(&names, observer, |def, progress| {
            let latest = outdated
                .iter()
                .find(|(name, _)| *name == def.name)
                .map(|(_, latest)| latest.clone());
            self.installer.install_resolved(def, latest, options, progress)
        })
    }

    pub fn uninstall<F>(&self, names: &[String], dry_run: bool, observer: F) -> RunSummary
    where
        F: FnMut(&str, Progress),
    {
        self.run(names, observer, |def, progress| {
            self.installer.uninstall(def, dry_run, progress)
        })
    }

    /// Uninstall every valid catalog tool that is currently installed
    pub fn uninstall_all<F>(&self, dry_run: bool, observer: F) -> RunSummary
    where
        F: FnMut(&str, Progress),
    {
        let installed: Vec<String> = self
            .catalog
            .definitions()
            .filter(|def| self.installer.probe(def).is_some())
            .map(|def| def.name.clone())
            .collect();
        self.uninstall(&installed, dry_run, observer)
    }

    fn run<F, A>(&self, names: &[String], mut observer: F, mut action: A) -> RunSummary
    where
        F: FnMut(&str, Progress),
        A: FnMut(&ToolDefinition, Progress) -> Outcome,
    {
        let total = names.len();
        names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let progress = Progress {
                    position: index + 1,
                    total,
                };
                observer(name, progress);
                let outcome = match self.catalog.definition(name) {
                    Ok(def) => action(def, progress),
                    Err(err) => Outcome::Failed(err),
                };
                (name.clone(), outcome)
            })
            .collect()
    }
}
