//! Clip image resolution.

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use rand::Rng;
use sitcom_common::{SitcomResult, WorkDir};
use sitcom_script_model::Script;

use crate::fetch::AssetFetcher;

/// Where clip images come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageEngine {
    /// Only images already on disk or reachable by URL. Prompts without an
    /// image are left unresolved and render as a placeholder frame.
    #[default]
    Provided,

    /// Random solid-colour stand-ins for every prompt; no network.
    Debug,
}

/// Callback invoked with `(clip_index, image_path)` after each image lands.
pub type ImageCallback<'a> = &'a (dyn Fn(usize, &std::path::Path) + Send + Sync);

/// Fills `image_path` for every clip that can get one.
pub struct ImageResolver<'a> {
    engine: ImageEngine,
    fetcher: &'a AssetFetcher,
    workdir: &'a WorkDir,
    width: u32,
    height: u32,
    on_image: Option<ImageCallback<'a>>,
}

impl<'a> ImageResolver<'a> {
    pub fn new(engine: ImageEngine, fetcher: &'a AssetFetcher, workdir: &'a WorkDir) -> Self {
        Self {
            engine,
            fetcher,
            workdir,
            width: 720,
            height: 1280,
            on_image: None,
        }
    }

    /// Size of generated debug images.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn on_image(mut self, callback: ImageCallback<'a>) -> Self {
        self.on_image = Some(callback);
        self
    }

    /// Return a copy of `script` with image paths filled in.
    ///
    /// Download failures are logged and leave the clip without an image.
    /// Only local write failures abort.
    pub async fn resolve_images(&self, script: &Script) -> SitcomResult<Script> {
        let mut paths: Vec<Option<PathBuf>> = Vec::with_capacity(script.clips.len());

        for (i, clip) in script.clips.iter().enumerate() {
            let resolved = if let Some(existing) = &clip.image_path {
                Some(existing.clone())
            } else if let Some(url) = &clip.image_url {
                match self
                    .fetcher
                    .download_to(url, self.workdir, &format!("image-{i:03}-"), "png")
                    .await
                {
                    Ok(path) => Some(path),
                    Err(e) if !e.is_fatal() => {
                        tracing::warn!(clip = i, url = %url, error = %e, "Image download failed, clip will use a placeholder");
                        None
                    }
                    Err(e) => return Err(e),
                }
            } else if clip.needs_image() {
                match self.engine {
                    ImageEngine::Debug => Some(self.solid_color_image(i)?),
                    ImageEngine::Provided => {
                        tracing::warn!(clip = i, "No image available for prompt, clip will use a placeholder");
                        None
                    }
                }
            } else {
                None
            };

            if let (Some(path), Some(callback)) = (&resolved, self.on_image) {
                if clip.image_path.is_none() {
                    callback(i, path);
                }
            }
            paths.push(resolved);
        }

        script
            .with_image_paths(paths)
            .map_err(|e| sitcom_common::SitcomError::script(e.to_string()))
    }

    fn solid_color_image(&self, index: usize) -> SitcomResult<PathBuf> {
        let mut rng = rand::thread_rng();
        let color = Rgb([rng.gen::<u8>(), rng.gen::<u8>(), rng.gen::<u8>()]);
        let img = RgbImage::from_pixel(self.width, self.height, color);

        let path = self
            .workdir
            .scratch_file(&format!("image-{index:03}-"), ".png")?;
        img.save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        tracing::debug!(clip = index, path = %path.display(), "Generated debug image");
        Ok(path)
    }
}
