//! Render run: probe, plan, encode each clip, concatenate, publish.
//!
//! ```text
//! Idle ─▶ RenderingClip(0) ─▶ … ─▶ RenderingClip(n-1) ─▶ Concatenating ─▶ Done
//! ```
//!
//! Any failure aborts the run. The final file is encoded inside the work
//! directory and only moved to its destination once complete, so a failed
//! run never leaves a partial video at the output path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sitcom_common::{SitcomError, SitcomResult, WorkDir};
use sitcom_planner::{ClipPlan, ClipPlanner};
use sitcom_script_model::Script;

use crate::command::RenderBackend;
use crate::concat::concat_command;
use crate::config::RenderConfig;
use crate::segment::{segment_command, OverlayFiles};

/// Progress callback for rendering.
pub type ProgressCallback = Box<dyn Fn(RenderProgress) + Send + Sync>;

/// Render progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProgress {
    pub stage: RenderStage,
    /// Segments encoded so far.
    pub clips_done: usize,
    pub total_clips: usize,
}

/// Stages of a render run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Idle,
    RenderingClip(usize),
    Concatenating,
    Done,
}

/// Turns a fully resolved script into a video file.
pub struct Renderer {
    backend: Arc<dyn RenderBackend>,
    config: RenderConfig,
    planner: ClipPlanner,
    progress: Option<ProgressCallback>,
}

impl Renderer {
    pub fn new(backend: Arc<dyn RenderBackend>, config: RenderConfig, planner: ClipPlanner) -> Self {
        Self {
            backend,
            config,
            planner,
            progress: None,
        }
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Fail early when the encoder cannot run, before any slow upstream work.
    pub fn ensure_available(&self) -> SitcomResult<()> {
        if self.backend.is_available() {
            Ok(())
        } else {
            Err(SitcomError::unsupported(format!(
                "render backend '{}' is not available (expected ffmpeg and ffprobe in PATH)",
                self.backend.name()
            )))
        }
    }

    fn report(&self, stage: RenderStage, clips_done: usize, total_clips: usize) {
        if let Some(cb) = &self.progress {
            cb(RenderProgress {
                stage,
                clips_done,
                total_clips,
            });
        }
    }

    /// Render `script` to `output` and return the path actually written
    /// (the file name is sanitized).
    pub async fn render(
        &mut self,
        script: &Script,
        output: &Path,
        workdir: &WorkDir,
    ) -> SitcomResult<PathBuf> {
        let total = script.clips.len();
        if total == 0 {
            return Err(SitcomError::script("script has no clips to render"));
        }
        self.ensure_available()?;

        let destination = sanitize_output_path(output);
        tracing::info!(
            backend = self.backend.name(),
            clips = total,
            output = %destination.display(),
            "Starting render"
        );
        self.report(RenderStage::Idle, 0, total);

        let audio_secs = self.probe_audio(script).await;
        let plans = self.planner.plan_script(script, &audio_secs);
        let speed = self.planner.config().effective_speed();

        let mut segments = Vec::with_capacity(total);
        for plan in &plans {
            self.report(RenderStage::RenderingClip(plan.index), plan.index, total);
            let segment = self.render_segment(plan, speed, workdir).await?;
            segments.push(segment);
        }

        self.report(RenderStage::Concatenating, total, total);
        let total_secs: f64 = plans.iter().map(|p| p.duration_secs).sum();
        let music = script
            .metadata
            .bgm_path
            .as_deref()
            .filter(|path| path.exists());
        if script.metadata.bgm_path.is_some() && music.is_none() {
            tracing::warn!("Background music file missing, rendering without music");
        }

        let extension = destination
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4");
        let staged = workdir.child(&format!("final.{extension}"));
        let cmd = concat_command(&segments, music, total_secs, &self.config, &staged);
        self.backend.run("concatenate clips", &cmd).await?;

        publish(&staged, &destination).await?;
        self.report(RenderStage::Done, total, total);
        tracing::info!(
            output = %destination.display(),
            duration_secs = total_secs,
            "Render complete"
        );
        Ok(destination)
    }

    /// Audio length per clip. Unreadable audio is logged and treated as
    /// absent for timing; the encode step surfaces the real error.
    async fn probe_audio(&self, script: &Script) -> Vec<Option<f64>> {
        let mut durations = Vec::with_capacity(script.clips.len());
        for (i, clip) in script.clips.iter().enumerate() {
            let secs = match &clip.audio_path {
                Some(path) => match self.backend.probe_duration(path).await {
                    Ok(secs) => Some(secs),
                    Err(e) => {
                        tracing::warn!(clip = i, path = %path.display(), error = %e, "Could not probe audio duration");
                        None
                    }
                },
                None => None,
            };
            durations.push(secs);
        }
        durations
    }

    async fn render_segment(
        &self,
        plan: &ClipPlan,
        speed: f64,
        workdir: &WorkDir,
    ) -> SitcomResult<PathBuf> {
        let mut overlays = OverlayFiles::default();
        if let Some(caption) = &plan.caption {
            let path = workdir.scratch_file(&format!("caption-{:03}-", plan.index), ".txt")?;
            tokio::fs::write(&path, caption.text()).await?;
            overlays.caption = Some(path);
        }
        if let Some(banner) = &plan.banner {
            let path = workdir.scratch_file(&format!("banner-{:03}-", plan.index), ".txt")?;
            tokio::fs::write(&path, banner).await?;
            overlays.banner = Some(path);
        }

        let output = workdir.child(&format!("segment-{:03}.mp4", plan.index));
        let cmd = segment_command(plan, &self.config, speed, &overlays, &output);
        tracing::info!(
            clip = plan.index,
            duration_secs = plan.duration_secs,
            fallback = plan.is_fallback(),
            "Rendering clip"
        );
        self.backend
            .run(&format!("render clip {}", plan.index + 1), &cmd)
            .await?;
        Ok(output)
    }
}

/// Move the finished file into place, copying when a rename crosses
/// filesystems.
async fn publish(staged: &Path, destination: &Path) -> SitcomResult<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    if tokio::fs::rename(staged, destination).await.is_err() {
        tokio::fs::copy(staged, destination).await?;
        tokio::fs::remove_file(staged).await?;
    }
    Ok(())
}

/// Strip characters that are unsafe in file names from the last path
/// component.
pub fn sanitize_output_path(path: &Path) -> PathBuf {
    const UNSAFE: [char; 7] = [':', '?', '*', '"', '<', '>', '|'];
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return path.join("output.mp4");
    };
    let cleaned: String = name.chars().filter(|c| !UNSAFE.contains(c)).collect();
    let cleaned = if cleaned.trim().is_empty() {
        "output.mp4".to_string()
    } else {
        cleaned
    };
    path.with_file_name(cleaned)
}

/// Where the resolved script is saved next to a rendered video.
pub fn sibling_script_path(output: &Path) -> PathBuf {
    output.with_extension("toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_output_path() {
        assert_eq!(
            sanitize_output_path(Path::new("out/Frog: The Movie?.mp4")),
            PathBuf::from("out/Frog The Movie.mp4")
        );
        assert_eq!(
            sanitize_output_path(Path::new("a<b>|\"c*.mp4")),
            PathBuf::from("abc.mp4")
        );
        assert_eq!(
            sanitize_output_path(Path::new("dir/??")),
            PathBuf::from("dir/output.mp4")
        );
    }

    #[test]
    fn test_sibling_script_path() {
        assert_eq!(
            sibling_script_path(Path::new("videos/frog.mp4")),
            PathBuf::from("videos/frog.toml")
        );
    }
}
