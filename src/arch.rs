use crate::error::ToolError;
use anyhow::{Context, Result};
use std::fmt;
use std::process::Command;

/// Architecture tokens used in release archive names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalArch {
    Amd64,
    Arm64,
    Arm,
    I386,
}

impl CanonicalArch {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalArch::Amd64 => "amd64",
            CanonicalArch::Arm64 => "arm64",
            CanonicalArch::Arm => "arm",
            CanonicalArch::I386 => "386",
        }
    }
}

impl fmt::Display for CanonicalArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a `uname -m` style machine identifier to its canonical token
pub fn resolve(host_arch: &str) -> Result<CanonicalArch, ToolError> {
    match host_arch.trim() {
        "x86_64" => Ok(CanonicalArch::Amd64),
        "aarch64" => Ok(CanonicalArch::Arm64),
        "armv7l" => Ok(CanonicalArch::Arm),
        "i386" | "i686" => Ok(CanonicalArch::I386),
        other => Err(ToolError::UnsupportedArchitecture(other.to_string())),
    }
}

/// Source of the host machine identifier.
pub trait ArchProvider {
    fn host_arch(&self) -> Result<String>;
}

/// Reads the machine identifier from `uname -m`.
pub struct Uname;

impl ArchProvider for Uname {
    fn host_arch(&self) -> Result<String> {
        let output = Command::new("uname")
            .arg("-m")
            .output()
            .context("Failed to execute uname -m")?;

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "uname -m exited with status: {}",
                output.status
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported() {
        assert_eq!(resolve("x86_64"), Ok(CanonicalArch::Amd64));
        assert_eq!(resolve("aarch64"), Ok(CanonicalArch::Arm64));
        assert_eq!(resolve("armv7l"), Ok(CanonicalArch::Arm));
        assert_eq!(resolve("i386"), Ok(CanonicalArch::I386));
        assert_eq!(resolve("i686"), Ok(CanonicalArch::I386));
        assert_eq!(resolve("x86_64\n"), Ok(CanonicalArch::Amd64));
    }

    #[test]
    fn test_resolve_unsupported() {
        for host in ["riscv64", "ppc64le", "s390x", "amd64", ""] {
            assert_eq!(
                resolve(host),
                Err(ToolError::UnsupportedArchitecture(host.to_string()))
            );
        }
    }

    #[test]
    fn test_canonical_tokens() {
        let tokens: Vec<&str> = [
            CanonicalArch::Amd64,
            CanonicalArch::Arm64,
            CanonicalArch::Arm,
            CanonicalArch::I386,
        ]
        .iter()
        .map(|a| a.as_str())
        .collect();
        assert_eq!(tokens, ["amd64", "arm64", "arm", "386"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_uname_reports_something() {
        let arch = Uname.host_arch().unwrap();
        assert!(!arch.is_empty());
    }
}
