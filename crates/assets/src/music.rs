//! Background music resolution.

use sitcom_common::{SitcomResult, WorkDir};
use sitcom_script_model::Script;

use crate::fetch::AssetFetcher;

/// Return a copy of `script` whose metadata points at a local music file.
///
/// An existing `bgm_path` wins. Otherwise `override_url`, then
/// `metadata.bgm_url`, is downloaded. A failed download is logged and the
/// script is returned unchanged.
pub async fn resolve_music(
    script: &Script,
    override_url: Option<&str>,
    fetcher: &AssetFetcher,
    workdir: &WorkDir,
) -> SitcomResult<Script> {
    if script.metadata.bgm_path.is_some() && override_url.is_none() {
        return Ok(script.clone());
    }

    let Some(url) = override_url.or(script.metadata.bgm_url.as_deref()) else {
        tracing::info!("No background music configured");
        return Ok(script.clone());
    };

    match fetcher.download_to(url, workdir, "bgm-", "mp3").await {
        Ok(path) => {
            tracing::info!(url, path = %path.display(), "Background music ready");
            Ok(script.with_metadata(script.metadata.with_bgm_path(Some(path))))
        }
        Err(e) if !e.is_fatal() => {
            tracing::warn!(url, error = %e, "Background music download failed");
            Ok(script.clone())
        }
        Err(e) => Err(e),
    }
}
