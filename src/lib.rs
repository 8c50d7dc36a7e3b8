pub mod arch;
pub mod archive;
pub mod artifact;
pub mod bulk;
pub mod catalog;
pub mod cli;
pub mod download;
pub mod error;
pub mod install;
pub mod models;
pub mod outcome;
pub mod report;
pub mod settings;
pub mod status;
pub mod version;

pub use error::ToolError;
pub use models::{RepoId, ToolDefinition};
pub use outcome::{Outcome, RunSummary};
