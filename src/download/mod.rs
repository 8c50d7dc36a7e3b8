use crate::models::RepoId;
use crate::version::Version;
use anyhow::Result;
use std::path::Path;

pub mod github;
pub mod http;

/// Where release metadata and artifacts come from.
pub trait ReleaseSource {
    /// Normalized tag of the repository's latest release
    fn latest_version(&self, repo: &RepoId) -> Result<Version>;

    /// Download `url` to `dest`
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}
