//! URL materialization.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, Url};
use sitcom_common::{SitcomError, SitcomResult, WorkDir};

/// Downloads remote assets to local files.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    http: Client,
}

impl AssetFetcher {
    pub fn new(timeout: Duration) -> SitcomResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SitcomError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Fetch `url` into `dest`.
    ///
    /// Any transport error or non-2xx status becomes
    /// [`SitcomError::AssetDownloadFailed`]; `dest` is not created in that case.
    pub async fn download(&self, url: &str, dest: &Path) -> SitcomResult<PathBuf> {
        tracing::debug!(url, dest = %dest.display(), "Downloading asset");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SitcomError::asset_download(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitcomError::asset_download(url, format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SitcomError::asset_download(url, e.to_string()))?;
        tokio::fs::write(dest, &bytes).await?;

        tracing::debug!(url, bytes = bytes.len(), "Asset downloaded");
        Ok(dest.to_path_buf())
    }

    /// Fetch `url` into a fresh file of the work directory, keeping the URL's
    /// extension (or `default_ext` when it has none).
    pub async fn download_to(
        &self,
        url: &str,
        workdir: &WorkDir,
        prefix: &str,
        default_ext: &str,
    ) -> SitcomResult<PathBuf> {
        let ext = url_extension(url).unwrap_or_else(|| default_ext.to_string());
        let dest = workdir.scratch_file(prefix, &format!(".{ext}"))?;
        match self.download(url, &dest).await {
            Ok(path) => Ok(path),
            Err(e) => {
                let _ = std::fs::remove_file(&dest);
                Err(e)
            }
        }
    }
}

/// Lowercased file extension of the URL's last path segment.
pub fn url_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?.to_string();
    let ext = Path::new(&segment).extension()?.to_str()?.to_ascii_lowercase();
    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}
