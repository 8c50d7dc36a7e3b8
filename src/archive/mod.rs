use anyhow::Result;
use std::path::Path;

pub mod tar;
pub mod zip;

/// How a downloaded artifact is unpacked, decided by its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
    /// Not an archive: the download is the executable itself
    Bare,
}

impl ArchiveKind {
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            ArchiveKind::TarGz
        } else if lower.ends_with(".zip") {
            ArchiveKind::Zip
        } else {
            ArchiveKind::Bare
        }
    }
}

/// Unpack `archive` into `dest`, returning the number of entries written.
/// `Bare` artifacts have nothing to unpack.
pub fn extract(kind: ArchiveKind, archive: &Path, dest: &Path) -> Result<usize> {
    match kind {
        ArchiveKind::TarGz => tar::extract_tar_gz(archive, dest),
        ArchiveKind::Zip => zip::extract_zip(archive, dest),
        ArchiveKind::Bare => Ok(0),
    }
}
