use anyhow::{Context, Result};
use glob_match::glob_match;
use std::fs;
use std::path::{Path, PathBuf};

/// Whether a binary path pattern needs a search instead of a direct lookup
pub fn is_wildcard(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Check if a file is executable
pub fn is_executable(path: &Path) -> Result<bool> {
    let metadata = fs::metadata(path)?;

    if !metadata.is_file() {
        return Ok(false);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = metadata.permissions().mode();
        Ok(mode & 0o111 != 0)
    }

    #[cfg(not(unix))]
    {
        Ok(true)
    }
}

/// First file under `dir` whose `/`-separated relative path matches `pattern`.
///
/// Directory entries are visited in name order so the result is stable. A
/// pattern without `/` is also tried against bare file names.
pub fn find_matching_file(dir: &Path, pattern: &str) -> Result<Option<PathBuf>> {
    let pattern = pattern.trim_start_matches("./");
    let match_file_name = !pattern.contains('/');

    fn visit_dir(
        root: &Path,
        dir: &Path,
        pattern: &str,
        match_file_name: bool,
    ) -> Result<Option<PathBuf>> {
        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                if let Some(found) = visit_dir(root, &path, pattern, match_file_name)? {
                    return Ok(Some(found));
                }
                continue;
            }

            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let file_name = entry.file_name().to_string_lossy().into_owned();

            if glob_match(pattern, &relative)
                || (match_file_name && glob_match(pattern, &file_name))
            {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    visit_dir(dir, dir, pattern, match_file_name)
}

/// Copy `source` into `install_dir/name` with mode 0755.
///
/// The copy goes to a hidden sibling first and is then renamed over the
/// target, so a concurrent reader sees either the old or the new binary.
pub fn place_binary(source: &Path, install_dir: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(install_dir)
        .with_context(|| format!("Failed to create directory: {}", install_dir.display()))?;

    let target = install_dir.join(name);
    let staging = install_dir.join(format!(".{name}.ghbin-{}", std::process::id()));

    fs::copy(source, &staging).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            source.display(),
            staging.display()
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(&staging, fs::Permissions::from_mode(0o755)) {
            let _ = fs::remove_file(&staging);
            return Err(e).context("Failed to set executable permissions");
        }
    }

    fs::rename(&staging, &target).with_context(|| {
        let _ = fs::remove_file(&staging);
        format!("Failed to move binary into place: {}", target.display())
    })?;

    Ok(target)
}

/// Check if a directory is in PATH
pub fn is_directory_in_path(directory: &Path) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };
    let wanted = directory.canonicalize().unwrap_or_else(|_| directory.to_path_buf());
    std::env::split_paths(&path_var).any(|entry| {
        let entry = entry.canonicalize().unwrap_or(entry);
        entry == wanted
    })
}

/// Whether two paths name the same file, following symlinks where possible
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
