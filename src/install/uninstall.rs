use crate::error::ToolError;
use crate::install::executable::{Installer, Progress};
use crate::models::ToolDefinition;
use crate::outcome::{Outcome, SkipReason};
use std::fs;
use tracing::{info, warn};

impl Installer {
    /// Remove the binary found on the search path, wherever it lives
    pub fn uninstall(&self, def: &ToolDefinition, dry_run: bool, progress: Progress) -> Outcome {
        info!(
            tool = %def.name,
            position = progress.position,
            total = progress.total,
            dry_run,
            "uninstalling"
        );

        let Some(installed) = self.probe(def) else {
            return Outcome::Skipped(SkipReason::NotInstalled);
        };

        if dry_run {
            return Outcome::DryRun(format!("would remove {}", installed.path.display()));
        }

        self.terminate(def);

        match fs::remove_file(&installed.path) {
            Ok(()) => {
                info!(tool = %def.name, path = %installed.path.display(), "removed");
                Outcome::Removed {
                    path: installed.path,
                }
            }
            Err(e) => {
                let err = ToolError::RemovalFailed(format!(
                    "Failed to remove {}: {e}",
                    installed.path.display()
                ));
                warn!(tool = %def.name, error = %err, "uninstall failed");
                Outcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::testing::Harness;

    #[test]
    fn test_uninstall_removes_binary() {
        let h = Harness::new().installed("tool", Some("1.0.0"));
        let def = h.tool("tool", "tool.tar.gz", "tool");
        let path = h.installed_path("tool");

        let outcome = h.installer().uninstall(&def, false, Progress::single());

        assert_eq!(outcome, Outcome::Removed { path: path.clone() });
        assert!(!path.exists());
        assert_eq!(h.terminated(), ["tool"]);
    }

    #[test]
    fn test_uninstall_missing_tool_is_skipped() {
        let h = Harness::new();
        let def = h.tool("tool", "tool.tar.gz", "tool");

        let outcome = h.installer().uninstall(&def, false, Progress::single());

        assert_eq!(outcome, Outcome::Skipped(SkipReason::NotInstalled));
        assert!(h.terminated().is_empty());
    }

    #[test]
    fn test_uninstall_dry_run_keeps_binary() {
        let h = Harness::new().installed("tool", None);
        let def = h.tool("tool", "tool.tar.gz", "tool");
        let path = h.installed_path("tool");

        let outcome = h.installer().uninstall(&def, true, Progress::single());

        assert_eq!(
            outcome,
            Outcome::DryRun(format!("would remove {}", path.display()))
        );
        assert!(path.exists());
        assert!(h.terminated().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_uninstall_failure_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let h = Harness::new().installed("tool", Some("1.0.0"));
        let def = h.tool("tool", "tool.tar.gz", "tool");
        let path = h.installed_path("tool");
        let dir = path.parent().unwrap().to_path_buf();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        let outcome = h.installer().uninstall(&def, false, Progress::single());
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        // root ignores directory permissions
        if path.exists() {
            assert!(matches!(outcome, Outcome::Failed(ToolError::RemovalFailed(_))));
        }
    }
}
