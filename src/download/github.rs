use crate::download::{ReleaseSource, http};
use crate::models::RepoId;
use crate::settings::Settings;
use crate::version::Version;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const API_BASE: &str = "https://api.github.com";

/// The only field read from the latest-release document
#[derive(Debug, Deserialize)]
pub struct LatestRelease {
    #[serde(default)]
    pub tag_name: Option<String>,
}

/// GitHub Releases client (blocking, one request per call, no retry)
pub struct GitHubClient {
    agent: ureq::Agent,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            agent: http::agent(settings.timeout),
            token: settings.github_token.clone(),
        }
    }
}

/// Latest-release metadata endpoint for a repository
pub fn latest_release_url(api_base: &str, repo: &RepoId) -> String {
    format!(
        "{}/repos/{}/{}/releases/latest",
        api_base.trim_end_matches('/'),
        repo.owner,
        repo.name
    )
}

/// Extract and normalize the tag from a latest-release document
pub fn parse_latest_tag(release: &LatestRelease) -> Result<Version> {
    match release.tag_name.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => Ok(Version::new(tag)),
        _ => Err(anyhow::anyhow!("Release metadata has no tag_name")),
    }
}

impl ReleaseSource for GitHubClient {
    fn latest_version(&self, repo: &RepoId) -> Result<Version> {
        let api_url = latest_release_url(API_BASE, repo);
        debug!(url = %api_url, "fetching latest release");

        let mut request = self
            .agent
            .get(&api_url)
            .set("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request
            .call()
            .with_context(|| format!("Failed to fetch latest release for {repo}"))?;

        if response.status() != 200 {
            return Err(anyhow::anyhow!(
                "GitHub API request failed with status: {}",
                response.status()
            ));
        }

        let release: LatestRelease = response
            .into_json()
            .with_context(|| "Failed to parse GitHub release JSON")?;

        parse_latest_tag(&release)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url, dest = %dest.display(), "downloading artifact");
        http::download_file(&self.agent, url, dest)
    }
}
