use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;
use tar::Archive;
use tracing::debug;

/// Extract TAR.GZ archive, returns the number of entries unpacked
pub fn extract_tar_gz(tar_path: &Path, extract_to: &Path) -> Result<usize> {
    let file = fs::File::open(tar_path)
        .with_context(|| format!("Failed to open tar.gz file: {}", tar_path.display()))?;

    let decoder = GzDecoder::new(file);
    extract_tar_from_reader(decoder, extract_to)
}

fn extract_tar_from_reader<R: Read>(reader: R, extract_to: &Path) -> Result<usize> {
    let mut archive = Archive::new(reader);

    fs::create_dir_all(extract_to).with_context(|| {
        format!(
            "Failed to create extraction directory: {}",
            extract_to.display()
        )
    })?;

    let mut extracted = 0;

    for entry in archive
        .entries()
        .with_context(|| "Failed to read tar.gz entries")?
    {
        let mut entry = entry.with_context(|| "Failed to access tar.gz entry")?;
        let path = entry
            .path()
            .with_context(|| "Failed to get entry path")?
            .into_owned();

        // unpack_in refuses entries that would land outside extract_to
        let unpacked = entry
            .unpack_in(extract_to)
            .with_context(|| format!("Failed to extract file: {}", path.display()))?;

        if unpacked {
            extracted += 1;
        } else {
            debug!(entry = %path.display(), "skipped tar entry outside extraction root");
        }
    }

    debug!(count = extracted, dest = %extract_to.display(), "extracted tar.gz");
    Ok(extracted)
}
