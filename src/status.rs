use crate::catalog::Catalog;
use crate::error::ToolError;
use crate::install::Installer;
use crate::models::ToolDefinition;
use crate::version::Version;
use std::path::PathBuf;

/// Installed-vs-latest snapshot of one tool, computed fresh on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationState {
    pub installed_path: Option<PathBuf>,
    pub installed_version: Option<Version>,
    pub latest: Result<Version, ToolError>,
}

impl InstallationState {
    pub fn is_installed(&self) -> bool {
        self.installed_path.is_some()
    }

    /// Installed and behind the latest release.
    ///
    /// A binary whose version could not be parsed counts as behind; an
    /// unreachable release endpoint never does.
    pub fn is_outdated(&self) -> bool {
        match &self.latest {
            Ok(latest) => self.is_installed() && self.installed_version.as_ref() != Some(latest),
            Err(_) => false,
        }
    }
}

/// Probe the local binary and look up the latest release
pub fn installation_state(installer: &Installer, def: &ToolDefinition) -> InstallationState {
    let installed = installer.probe(def);
    InstallationState {
        installed_path: installed.as_ref().map(|t| t.path.clone()),
        installed_version: installed.and_then(|t| t.version),
        latest: installer.latest_version(def),
    }
}

/// Tool name with its state, or the reason its catalog entry is unusable
pub type StatusRow = (String, Result<InstallationState, ToolError>);

/// States for the named tools. Invalid or unknown entries keep their error
/// and do not stop the remaining lookups.
pub fn catalog_states(
    installer: &Installer,
    catalog: &Catalog,
    names: &[String],
) -> Vec<StatusRow> {
    names
        .iter()
        .map(|name| {
            let state = catalog
                .definition(name)
                .map(|def| installation_state(installer, def));
            (name.clone(), state)
        })
        .collect()
}
