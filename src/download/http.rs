use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("ghbin/", env!("CARGO_PKG_VERSION"));

/// HTTP agent shared by metadata and download requests.
///
/// `timeout` bounds connecting and each individual socket read or write, so a
/// stalled connection fails while a slow but steady download does not.
pub fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .timeout_write(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Download file via HTTP/HTTPS
pub fn download_file(agent: &ureq::Agent, url: &str, path: &Path) -> Result<()> {
    let response = agent
        .get(url)
        .call()
        .with_context(|| format!("Failed to download: {url}"))?;

    if response.status() != 200 {
        return Err(anyhow::anyhow!(
            "Download failed with status: {}",
            response.status()
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Write next to the target first so a partial body never sits at `path`
    let temp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("download")
    ));

    let mut temp_file = fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create temporary file: {}", temp_path.display()))?;

    std::io::copy(&mut response.into_reader(), &mut temp_file).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to write to temporary file: {}", temp_path.display())
    })?;

    temp_file.sync_all().with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to sync temporary file: {}", temp_path.display())
    })?;

    let file_size = temp_file.metadata()?.len();
    drop(temp_file);

    fs::rename(&temp_path, path).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!(
            "Failed to move temporary file to final location: {} -> {}",
            temp_path.display(),
            path.display()
        )
    })?;

    debug!(path = %path.display(), bytes = file_size, "downloaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    /// Serve one response, sleeping `delay` before every body byte
    fn serve_slowly(body: &'static [u8], delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let _ = write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            for byte in body {
                thread::sleep(delay);
                if stream.write_all(&[*byte]).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        });
        format!("http://{addr}/tool")
    }

    #[test]
    fn test_slow_download_outlasting_timeout_succeeds() {
        let url = serve_slowly(b"slow binary!", Duration::from_millis(250));
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("tool");

        download_file(&agent(Duration::from_secs(1)), &url, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"slow binary!");
    }

    #[test]
    fn test_stalled_download_times_out() {
        let url = serve_slowly(b"x", Duration::from_secs(3));
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("tool");

        let result = download_file(&agent(Duration::from_millis(500)), &url, &dest);

        assert!(result.is_err());
        assert!(!dest.exists());
    }
}
