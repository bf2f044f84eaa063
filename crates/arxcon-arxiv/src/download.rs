use crate::error::{ArxivError, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Stream `url` into `dir/file_name`
pub async fn download_to(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);

    let mut resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(ArxivError::Status {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }

    let mut file = tokio::fs::File::create(&path).await?;
    let mut written = 0usize;
    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;

    debug!("downloaded {} bytes to {}", written, path.display());
    Ok(path)
}

/// Remove downloaded files and then their directory.
///
/// Returns the paths that could not be removed; callers only warn about them.
pub fn remove_downloads(dir: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
    let mut failed = Vec::new();
    for file in files {
        if let Err(e) = std::fs::remove_file(file) {
            tracing::warn!("could not delete {}: {}", file.display(), e);
            failed.push(file.clone());
        }
    }
    if let Err(e) = std::fs::remove_dir(dir) {
        tracing::warn!("could not delete {}: {}", dir.display(), e);
        failed.push(dir.to_path_buf());
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_files_then_dir() {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join(".papers");
        std::fs::create_dir_all(&dir).unwrap();
        let a = dir.join("a.pdf");
        let b = dir.join("b.pdf");
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&b, b"y").unwrap();

        let failed = remove_downloads(&dir, &[a, b]);
        assert!(failed.is_empty());
        assert!(!dir.exists());
    }

    #[test]
    fn reports_leftovers_without_failing() {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join(".papers");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("untracked.pdf"), b"z").unwrap();

        let failed = remove_downloads(&dir, &[dir.join("missing.pdf")]);
        assert_eq!(failed.len(), 2);
        assert!(dir.exists());
    }
}
