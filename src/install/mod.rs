pub mod executable;
pub mod probe;
pub mod process;
pub mod uninstall;
pub mod utils;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use executable::{InstallOptions, Installer, Progress};
pub use probe::{InstalledTool, SystemProbe, VersionProbe};
pub use process::{Pkill, ProcessControl};
