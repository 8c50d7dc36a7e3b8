use crate::models::ToolDefinition;
use crate::version::Version;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// A binary found on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTool {
    pub path: PathBuf,
    /// `None` when the version command output did not match the pattern
    pub version: Option<Version>,
}

/// Detects whether a tool is installed and which version it reports.
pub trait VersionProbe {
    /// `None` means the application is not on the search path
    fn probe(&self, def: &ToolDefinition) -> Option<InstalledTool>;
}

/// Looks the application up on `PATH` (or an explicit search path) and runs
/// its version command.
#[derive(Debug, Clone, Default)]
pub struct SystemProbe {
    search_path: Option<OsString>,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search these directories instead of `PATH`
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn locate(&self, application_name: &str) -> Option<PathBuf> {
        match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                which::which_in(application_name, Some(paths), cwd).ok()
            }
            None => which::which(application_name).ok(),
        }
    }
}

impl VersionProbe for SystemProbe {
    fn probe(&self, def: &ToolDefinition) -> Option<InstalledTool> {
        let path = self.locate(&def.application_name)?;
        let version = run_version_command(&path, &def.version_args())
            .and_then(|output| def.version_extractor().extract(&output));

        debug!(
            tool = %def.name,
            path = %path.display(),
            version = version.as_ref().map(Version::as_str).unwrap_or("unknown"),
            "probed installed tool"
        );
        Some(InstalledTool { path, version })
    }
}

/// Stdout followed by stderr; `None` if the binary could not be started
fn run_version_command(path: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| debug!(path = %path.display(), error = %e, "version command failed to start"))
        .ok()?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push('\n');
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Some(combined)
}
