use thiserror::Error;

/// Failure of a single tool's install, upgrade or removal.
///
/// None of these abort a bulk run; they are recorded as `Outcome::Failed`
/// and processing moves on to the next tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("latest version unavailable: {0}")]
    RemoteVersionUnavailable(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("extract failed: {0}")]
    ExtractFailed(String),

    #[error("{}: {path}", not_found_label(.wildcard))]
    BinaryNotFound { path: String, wildcard: bool },

    #[error("installation failed: {0}")]
    InstallationFailed(String),

    #[error("removal failed: {0}")]
    RemovalFailed(String),
}

fn not_found_label(wildcard: &bool) -> &'static str {
    if *wildcard {
        "binary not found in archive"
    } else {
        "binary not found"
    }
}

impl ToolError {
    /// Wrap an `anyhow` chain, keeping every context layer in the message.
    pub(crate) fn cause(err: &anyhow::Error) -> String {
        format!("{err:#}")
    }
}
