use crate::arch::CanonicalArch;
use crate::models::RepoId;
use crate::version::Version;

pub const VERSION_PLACEHOLDER: &str = "%VERSION%";
pub const ARCH_PLACEHOLDER: &str = "%ARCH%";

/// Release asset file name. `%VERSION%` expands to the bare version.
pub fn resolve_archive_name(pattern: &str, version: &Version, arch: CanonicalArch) -> String {
    substitute(pattern, version.as_str(), arch)
}

/// Path of the executable inside the artifact. `%VERSION%` expands to the
/// `v`-prefixed version, matching how release archives name their top directory.
/// A literal `v` already written before the placeholder is not doubled.
pub fn resolve_binary_path(pattern: &str, version: &Version, arch: CanonicalArch) -> String {
    let tagged = version.tagged();
    let pattern = pattern.replace(&format!("v{VERSION_PLACEHOLDER}"), &tagged);
    substitute(&pattern, &tagged, arch)
}

/// Release download URL; the tag is always `v{version}`
pub fn download_url(repo: &RepoId, version: &Version, archive_name: &str) -> String {
    format!(
        "https://github.com/{}/{}/releases/download/{}/{}",
        repo.owner,
        repo.name,
        version.tagged(),
        archive_name
    )
}

fn substitute(pattern: &str, version: &str, arch: CanonicalArch) -> String {
    pattern
        .replace(VERSION_PLACEHOLDER, version)
        .replace(ARCH_PLACEHOLDER, arch.as_str())
}
