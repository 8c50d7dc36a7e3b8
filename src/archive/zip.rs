use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Extract ZIP archive, returns the number of entries unpacked
pub fn extract_zip(zip_path: &Path, extract_to: &Path) -> Result<usize> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("Failed to open zip file: {}", zip_path.display()))?;

    let mut archive = ZipArchive::new(file).with_context(|| "Failed to read zip archive")?;

    fs::create_dir_all(extract_to).with_context(|| {
        format!(
            "Failed to create extraction directory: {}",
            extract_to.display()
        )
    })?;

    let mut extracted_count = 0;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .with_context(|| format!("Failed to access zip entry {i}"))?;

        let Some(relative) = file.enclosed_name().map(Path::to_path_buf) else {
            debug!(entry = file.name(), "skipped zip entry outside extraction root");
            continue;
        };
        let outpath = extract_to.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&outpath)
                .with_context(|| format!("Failed to create directory: {}", outpath.display()))?;
        } else {
            if let Some(p) = outpath.parent()
                && !p.exists()
            {
                fs::create_dir_all(p).with_context(|| {
                    format!("Failed to create parent directory: {}", p.display())
                })?;
            }

            let mut outfile = fs::File::create(&outpath).with_context(|| {
                format!("Failed to create extracted file: {}", outpath.display())
            })?;

            std::io::copy(&mut file, &mut outfile)
                .with_context(|| format!("Failed to extract file: {}", outpath.display()))?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
            }
        }

        extracted_count += 1;
    }

    debug!(count = extracted_count, dest = %extract_to.display(), "extracted zip");
    Ok(extracted_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.zip");
        {
            let file = fs::File::create(&archive).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer.add_directory("bin/", FileOptions::default()).unwrap();
            writer
                .start_file(
                    "bin/tool",
                    FileOptions::default().unix_permissions(0o755),
                )
                .unwrap();
            writer.write_all(b"#!/bin/sh\necho tool\n").unwrap();
            writer.finish().unwrap();
        }

        let dest = temp.path().join("out");
        let count = extract_zip(&archive, &dest).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            fs::read(dest.join("bin/tool")).unwrap(),
            b"#!/bin/sh\necho tool\n"
        );
    }

    #[test]
    fn test_extract_not_a_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.zip");
        fs::write(&archive, b"PK? no").unwrap();
        assert!(extract_zip(&archive, &temp.path().join("out")).is_err());
    }
}
