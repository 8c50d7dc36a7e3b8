use crate::error::ToolError;
use crate::version::{RegexExtractor, VersionExtractor};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Raw `[tools.<name>]` table as written in the catalog file
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ToolSpec {
    #[serde(default)]
    pub description: String,
    /// Binary name used for PATH lookup and process control
    #[serde(default)]
    pub application_name: String,
    /// GitHub repository in format "owner/repo"
    #[serde(default)]
    pub repository: String,
    /// Arguments that make the binary print its version (defaults to `--version`)
    #[serde(default)]
    pub version_command_args: Vec<String>,
    /// Regex applied to the version command output
    #[serde(default)]
    pub version_pattern: String,
    /// Release asset name, may contain `%VERSION%` and `%ARCH%`
    #[serde(default)]
    pub archive_pattern: String,
    /// Path of the executable inside the extracted archive, may contain placeholders and `*`
    #[serde(default)]
    pub binary_path_pattern: String,
}

/// GitHub repository identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches('/');
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!("repository must be in owner/name form, got '{s}'")),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A validated tool record. Only values of this type reach the installer.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub application_name: String,
    pub repository: RepoId,
    pub version_command_args: Vec<String>,
    version_extractor: RegexExtractor,
    pub archive_pattern: String,
    pub binary_path_pattern: String,
}

impl ToolDefinition {
    pub fn from_spec(name: &str, spec: ToolSpec) -> Result<Self, ToolError> {
        let required = [
            ("application_name", &spec.application_name),
            ("repository", &spec.repository),
            ("archive_pattern", &spec.archive_pattern),
            ("binary_path_pattern", &spec.binary_path_pattern),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ToolError::InvalidConfiguration(format!(
                    "{name}: {field} must not be empty"
                )));
            }
        }

        let repository = spec
            .repository
            .parse::<RepoId>()
            .map_err(|e| ToolError::InvalidConfiguration(format!("{name}: {e}")))?;

        let version_extractor = RegexExtractor::new(&spec.version_pattern).map_err(|e| {
            ToolError::InvalidConfiguration(format!("{name}: invalid version_pattern: {e}"))
        })?;

        Ok(Self {
            name: name.to_string(),
            description: spec.description,
            application_name: spec.application_name.trim().to_string(),
            repository,
            version_command_args: spec.version_command_args,
            version_extractor,
            archive_pattern: spec.archive_pattern.trim().to_string(),
            binary_path_pattern: spec.binary_path_pattern.trim().to_string(),
        })
    }

    /// Arguments for the version command, `--version` when none are configured
    pub fn version_args(&self) -> Vec<&str> {
        if self.version_command_args.is_empty() {
            vec!["--version"]
        } else {
            self.version_command_args.iter().map(String::as_str).collect()
        }
    }

    pub fn version_extractor(&self) -> &dyn VersionExtractor {
        &self.version_extractor
    }
}
