use regex::Regex;
use std::fmt;

/// Pattern used when a tool does not declare its own `version_pattern`
pub const DEFAULT_VERSION_PATTERN: &str = r"v?[0-9]+(?:\.[0-9]+)+";

/// Strip exactly one leading `v`/`V` from a version token
pub fn normalize(raw: &str) -> &str {
    raw.strip_prefix('v')
        .or_else(|| raw.strip_prefix('V'))
        .unwrap_or(raw)
}

/// A version token, always held in normalized form (no leading `v`).
///
/// Equality is byte equality of the normalized text; no semantic ordering
/// is attempted, so `1.10.0` and `1.9.0` are simply "different".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw.trim()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Version as used in GitHub release tags and archive directory names
    pub fn tagged(&self) -> String {
        format!("v{}", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pulls a version out of a tool's `--version` style output.
pub trait VersionExtractor {
    fn extract(&self, output: &str) -> Option<Version>;
}

/// Regex-backed extractor.
///
/// If the pattern has a capture group, group 1 is the version; otherwise the
/// whole first match is.
#[derive(Debug, Clone)]
pub struct RegexExtractor {
    regex: Regex,
}

impl RegexExtractor {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = if pattern.trim().is_empty() {
            DEFAULT_VERSION_PATTERN
        } else {
            pattern
        };
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl VersionExtractor for RegexExtractor {
    fn extract(&self, output: &str) -> Option<Version> {
        let captures = self.regex.captures(output)?;
        let found = captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str().trim())?;
        if found.is_empty() {
            return None;
        }
        Some(Version::new(found))
    }
}
