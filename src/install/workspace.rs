use crate::archive::{self, ArchiveKind};
use crate::download::ReleaseSource;
use crate::error::ToolError;
use crate::install::utils::{find_matching_file, is_wildcard};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Scratch directory owned by a single install. Removed when dropped.
///
/// Layout: `download/` holds the fetched artifact, `contents/` what the
/// binary is located in (extracted archive, or the bare binary itself).
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create_in(base: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("ghbin-").tempdir_in(base)?;
        fs::create_dir(dir.path().join("download"))?;
        fs::create_dir(dir.path().join("contents"))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn contents(&self) -> PathBuf {
        self.dir.path().join("contents")
    }

    /// Download `url` and unpack it according to the archive name.
    ///
    /// Returns the binary path to locate inside `contents/`: the configured
    /// `binary_path` for archives, `application_name` for bare downloads.
    pub fn fetch(
        &self,
        source: &dyn ReleaseSource,
        url: &str,
        archive_name: &str,
        application_name: &str,
        binary_path: &str,
    ) -> Result<String, ToolError> {
        let kind = ArchiveKind::from_file_name(archive_name);
        debug!(url, ?kind, workspace = %self.path().display(), "fetching artifact");

        if kind == ArchiveKind::Bare {
            source
                .download(url, &self.contents().join(application_name))
                .map_err(|e| ToolError::DownloadFailed(ToolError::cause(&e)))?;
            return Ok(application_name.to_string());
        }

        let file_name = Path::new(archive_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "artifact".into());
        let archive_path = self.path().join("download").join(file_name);

        source
            .download(url, &archive_path)
            .map_err(|e| ToolError::DownloadFailed(ToolError::cause(&e)))?;

        archive::extract(kind, &archive_path, &self.contents())
            .map_err(|e| ToolError::ExtractFailed(ToolError::cause(&e)))?;

        Ok(binary_path.to_string())
    }

    /// Find the binary inside `contents/`
    pub fn locate(&self, binary_path: &str) -> Result<PathBuf, ToolError> {
        let contents = self.contents();

        if is_wildcard(binary_path) {
            return find_matching_file(&contents, binary_path)
                .ok()
                .flatten()
                .ok_or_else(|| ToolError::BinaryNotFound {
                    path: binary_path.to_string(),
                    wildcard: true,
                });
        }

        let candidate = contents.join(binary_path.trim_start_matches("./"));
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(ToolError::BinaryNotFound {
                path: binary_path.to_string(),
                wildcard: false,
            })
        }
    }
}
