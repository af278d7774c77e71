//! Attachment download into a local temp directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Final path component of an attachment name; None for names like `..` or empty strings.
pub fn safe_file_name(name: &str) -> Option<String> {
    let normalized = name.replace('\\', "/");
    let file = Path::new(&normalized).file_name()?.to_str()?;
    if file.trim().is_empty() {
        return None;
    }
    Some(file.to_string())
}

/// Downloads `url` into `dir/<request_id>-<file name>` (creating `dir` if missing) and returns the
/// path. Distinct request ids never share a path, even for equal file names.
pub async fn download_to(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
    file_name: &str,
    request_id: u64,
) -> Result<PathBuf> {
    let name = safe_file_name(file_name)
        .with_context(|| format!("invalid attachment name: {}", file_name))?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let path = dir.join(format!("{}-{}", request_id, name));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "step: attachment downloaded");
    Ok(path)
}
