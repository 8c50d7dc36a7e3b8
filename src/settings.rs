use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INSTALL_PATH: &str = "/usr/local/bin";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `[settings]` table of the catalog file
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub install_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub install_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub github_token: Option<String>,
}

/// Effective settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub install_path: PathBuf,
    pub timeout: Duration,
    pub github_token: Option<String>,
}

impl Settings {
    /// Resolve settings by priority (highest first):
    /// 1. CLI flags / environment variables
    /// 2. Catalog `[settings]` table
    /// 3. Built-in defaults
    pub fn resolve(overrides: &SettingsOverrides, file: &FileSettings) -> Self {
        let install_path = overrides
            .install_path
            .clone()
            .or_else(|| file.install_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_PATH));

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let github_token = overrides
            .github_token
            .clone()
            .filter(|t| !t.trim().is_empty());

        Self {
            install_path,
            timeout: Duration::from_secs(timeout_secs),
            github_token,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&SettingsOverrides::default(), &FileSettings::default())
    }
}

/// Default catalog location: `$XDG_CONFIG_HOME/ghbin/tools.toml`
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ghbin").join("tools.toml"))
}
