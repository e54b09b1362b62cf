//! Paper file download with a bounded retry budget.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::document::Paper;
use crate::error::{RagError, Result};

/// Download `url` to `path`, retrying immediately on failure.
///
/// Up to `max_retry` attempts are made with no backoff. A non-success
/// status counts as a failed attempt.
///
/// # Errors
///
/// - [`RagError::Config`] when `max_retry` is zero.
/// - [`RagError::Connection`] when every attempt fails.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    max_retry: u32,
) -> Result<()> {
    if max_retry == 0 {
        return Err(RagError::Config(format!("invalid max retry: {max_retry}")));
    }

    for attempt in 1..=max_retry {
        info!(%url, attempt, max_retry, "downloading");
        match client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                let bytes = match response.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(%url, error = %e, "failed to read download body");
                        continue;
                    }
                };
                tokio::fs::write(path, &bytes).await?;
                info!(%url, path = %path.display(), "download complete");
                return Ok(());
            }
            Ok(response) => {
                warn!(%url, status = %response.status(), "download attempt failed");
            }
            Err(e) => {
                warn!(%url, error = %e, "download attempt failed");
            }
        }
    }

    Err(RagError::Connection { url: url.to_string(), attempts: max_retry })
}

impl Paper {
    /// Download this paper into `folder`, creating it if needed.
    ///
    /// The file name is the paper title when `use_title` is set, otherwise
    /// the last path segment of the URL. An already-present file is left
    /// alone and its path returned.
    ///
    /// # Errors
    ///
    /// Propagates [`download_file`] errors.
    pub async fn download(
        &self,
        client: &reqwest::Client,
        folder: &Path,
        use_title: bool,
        max_retry: u32,
    ) -> Result<PathBuf> {
        let file_name = if use_title {
            self.title.clone()
        } else {
            self.url.rsplit('/').next().unwrap_or(&self.url).to_string()
        };

        tokio::fs::create_dir_all(folder).await?;
        let path = folder.join(file_name);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            info!(path = %path.display(), "file already exists locally");
            return Ok(path);
        }

        download_file(client, &self.url, &path, max_retry).await?;
        Ok(path)
    }
}
