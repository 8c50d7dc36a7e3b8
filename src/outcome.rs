use crate::error::ToolError;
use crate::version::Version;
use std::fmt;
use std::path::PathBuf;

/// Why a tool was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyUpToDate,
    /// `--force` was given for a tool that is not installed
    ForceRequiresInstalled,
    NotInstalled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::AlreadyUpToDate => "already up to date",
            SkipReason::ForceRequiresInstalled => {
                "not installed; force only affects installed tools"
            }
            SkipReason::NotInstalled => "not installed",
        })
    }
}

/// Result of processing one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed {
        version: Version,
        /// Version that was replaced, when one was detected
        previous: Option<Version>,
    },
    ForceReinstalled {
        version: Version,
    },
    Removed {
        path: PathBuf,
    },
    /// Dry run: what would have happened
    DryRun(String),
    Skipped(SkipReason),
    Failed(ToolError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Installed {
                version,
                previous: Some(previous),
            } => write!(f, "upgraded {previous} -> {version}"),
            Outcome::Installed { version, .. } => write!(f, "installed {version}"),
            Outcome::ForceReinstalled { version } => write!(f, "reinstalled {version}"),
            Outcome::Removed { path } => write!(f, "removed {}", path.display()),
            Outcome::DryRun(action) => write!(f, "dry run: {action}"),
            Outcome::Skipped(reason) => write!(f, "skipped: {reason}"),
            Outcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Per-tool outcomes of one run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    entries: Vec<(String, Outcome)>,
}

/// Outcome counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    pub installed: usize,
    pub reinstalled: usize,
    pub removed: usize,
    pub dry_run: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn entries(&self) -> &[(String, Outcome)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|(_, o)| o.is_failure())
    }

    pub fn counts(&self) -> SummaryCounts {
        let mut counts = SummaryCounts::default();
        for (_, outcome) in &self.entries {
            match outcome {
                Outcome::Installed { .. } => counts.installed += 1,
                Outcome::ForceReinstalled { .. } => counts.reinstalled += 1,
                Outcome::Removed { .. } => counts.removed += 1,
                Outcome::DryRun(_) => counts.dry_run += 1,
                Outcome::Skipped(_) => counts.skipped += 1,
                Outcome::Failed(_) => counts.failed += 1,
            }
        }
        counts
    }
}

impl FromIterator<(String, Outcome)> for RunSummary {
    fn from_iter<I: IntoIterator<Item = (String, Outcome)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
