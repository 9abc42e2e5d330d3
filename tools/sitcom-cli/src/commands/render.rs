//! Render a script to video.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use sitcom_assets::{resolve_music, AssetFetcher, ImageEngine, ImageResolver};
use sitcom_common::{secs_to_duration, AppConfig, SystemClock, WorkDir};
use sitcom_planner::{ClipPlanner, PlannerConfig};
use sitcom_render_engine::{
    sibling_script_path, CaptionStyle, FfmpegBackend, RenderConfig, RenderProgress, RenderStage,
    Renderer,
};
use sitcom_script_model::Script;
use sitcom_voice::{
    BackoffPolicy, DebugVoice, FakeYouClient, VoiceCatalog, VoiceEngine, VoiceOrchestrator,
};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Script file (TOML)
    #[arg(short, long)]
    pub script_path: PathBuf,

    /// Output video path
    #[arg(short, long, default_value = "output.mp4")]
    pub output: PathBuf,

    /// Use offline stand-ins for both voices and images
    #[arg(long)]
    pub debug: bool,

    /// Use offline stand-in voices
    #[arg(long)]
    pub debug_audio: bool,

    /// Use solid-colour stand-in images
    #[arg(long)]
    pub debug_images: bool,

    /// Short-side resolution in pixels
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Frame orientation: portrait|landscape|square
    #[arg(long)]
    pub orientation: Option<String>,

    /// Playback speed multiplier
    #[arg(long, default_value = "1.0")]
    pub speed: f64,

    /// Draw captions with a drop shadow instead of a box
    #[arg(long)]
    pub text_shadow: bool,

    /// Audio codec: mp3|aac
    #[arg(long)]
    pub audio_codec: Option<String>,

    /// Disable pan and zoom on still images
    #[arg(long)]
    pub no_pan_and_zoom: bool,

    /// Background music URL (overrides the script's)
    #[arg(long)]
    pub music_url: Option<String>,

    /// Caption font file
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Art style recorded in the script metadata
    #[arg(long)]
    pub style: Option<String>,

    /// Mean seconds between voice job submissions
    #[arg(long)]
    pub audio_job_delay: Option<f64>,

    /// Mean seconds between voice job status polls
    #[arg(long)]
    pub audio_poll_delay: Option<f64>,

    /// Save the resolved script next to the video
    #[arg(long)]
    pub save_script: bool,

    /// Seed for narrator choice, jitter, motion and placeholders
    #[arg(long)]
    pub seed: Option<u64>,
}

pub async fn run(args: RenderArgs, config: &AppConfig) -> anyhow::Result<()> {
    println!("Rendering script: {}", args.script_path.display());

    let mut script = Script::load(&args.script_path)
        .map_err(|e| anyhow::anyhow!("Failed to load script: {e}"))?;
    for issue in script.validate() {
        tracing::warn!(issue = %issue, "Script issue");
    }
    if let Some(style) = &args.style {
        script = script.with_metadata(script.metadata.with_art_style(Some(style.clone())));
    }

    let render_config = render_config(&args, config)?;
    let (width, height) = render_config.dimensions();
    let mut planner_config = PlannerConfig {
        speed: args.speed,
        width,
        height,
        ..PlannerConfig::default()
    };
    planner_config.motion.enabled = config.render.pan_and_zoom && !args.no_pan_and_zoom;

    println!("  Output: {}", args.output.display());
    println!("  Resolution: {width}x{height} @ {} fps", render_config.fps);
    println!("  Clips: {}", script.clips.len());

    let planner = match args.seed {
        Some(seed) => ClipPlanner::seeded(planner_config, seed),
        None => ClipPlanner::new(planner_config),
    };
    let progress_cb = Box::new(|p: RenderProgress| match p.stage {
        RenderStage::RenderingClip(i) => {
            print!("\r  Rendering clip {}/{}  ", i + 1, p.total_clips);
        }
        RenderStage::Concatenating => print!("\r  Combining {} clips...  ", p.total_clips),
        RenderStage::Idle | RenderStage::Done => {}
    });
    let mut renderer = Renderer::new(Arc::new(FfmpegBackend::new()), render_config, planner)
        .on_progress(progress_cb);
    renderer.ensure_available()?;

    let workdir = WorkDir::create(config.work_dir.as_deref())?;
    let fetcher = AssetFetcher::new(Duration::from_secs(config.voice.request_timeout_secs))?;

    let voices = voice_engine(&args, config, &fetcher)?;
    println!("  Voices: {}", voices.name());
    let script = voices.add_voices(&script, &workdir).await?;

    let image_engine = if args.debug || args.debug_images {
        ImageEngine::Debug
    } else {
        ImageEngine::Provided
    };
    let on_image = |i: usize, path: &Path| println!("  Image {}: {}", i + 1, path.display());
    let script = ImageResolver::new(image_engine, &fetcher, &workdir)
        .with_size(width, height)
        .on_image(&on_image)
        .resolve_images(&script)
        .await?;

    let script = resolve_music(&script, args.music_url.as_deref(), &fetcher, &workdir).await?;

    let written = match renderer.render(&script, &args.output, &workdir).await {
        Ok(path) => path,
        Err(e) => {
            println!("\nRender failed.");
            return Err(e.into());
        }
    };
    println!("\nRender complete: {}", written.display());

    if args.save_script {
        let script_path = sibling_script_path(&written);
        portable_script(&script, &workdir)
            .save(&script_path)
            .map_err(|e| anyhow::anyhow!("Failed to save script: {e}"))?;
        println!("  Script saved: {}", script_path.display());
    }

    Ok(())
}

fn render_config(args: &RenderArgs, config: &AppConfig) -> anyhow::Result<RenderConfig> {
    let mut render = RenderConfig::from_defaults(&config.render)?;
    if let Some(resolution) = args.resolution {
        render.resolution = resolution;
    }
    if let Some(orientation) = &args.orientation {
        render.orientation = orientation.parse()?;
    }
    if let Some(codec) = &args.audio_codec {
        render.audio_codec = codec.parse()?;
    }
    if let Some(font) = &args.font {
        render.font = font.clone();
    }
    if args.text_shadow {
        render.caption_style = CaptionStyle::Shadow;
    }
    if !render.font.exists() {
        tracing::warn!(font = %render.font.display(), "Caption font not found, ffmpeg will fail on captioned clips");
    }
    Ok(render)
}

fn voice_engine(
    args: &RenderArgs,
    config: &AppConfig,
    fetcher: &AssetFetcher,
) -> anyhow::Result<VoiceEngine> {
    let on_voice = Box::new(|i: usize, path: &Path| {
        println!("  Voice {}: {}", i + 1, path.display());
    });
    if args.debug || args.debug_audio {
        return Ok(VoiceEngine::Debug(DebugVoice::new().on_voice(on_voice)));
    }

    let mut backoff = BackoffPolicy::from_defaults(&config.voice);
    if let Some(secs) = args.audio_job_delay {
        backoff = backoff.with_job_delay(secs_to_duration(secs));
    }
    if let Some(secs) = args.audio_poll_delay {
        backoff = backoff.with_poll_delay(secs_to_duration(secs));
    }

    let api = FakeYouClient::from_defaults(&config.voice)?;
    let mut orchestrator = VoiceOrchestrator::new(
        Arc::new(api),
        fetcher.clone(),
        VoiceCatalog::default(),
        backoff,
        Arc::new(SystemClock::start()),
    )
    .on_voice(on_voice);
    if let Some(seed) = args.seed {
        orchestrator = orchestrator.with_seed(seed);
    }
    Ok(VoiceEngine::Remote(orchestrator))
}

/// Drop local paths that point into the run's scratch directory, which is
/// deleted when the command exits. Synthesized clips keep their provider
/// `audio_url`, so a re-render fetches them again instead of re-synthesizing.
fn portable_script(script: &Script, workdir: &WorkDir) -> Script {
    let scratch = |path: &Option<PathBuf>| {
        path.as_deref()
            .is_some_and(|p| p.starts_with(workdir.path()))
    };
    let clips = script
        .clips
        .iter()
        .map(|clip| {
            let mut clip = clip.clone();
            if scratch(&clip.audio_path) {
                clip.audio_path = None;
            }
            if scratch(&clip.image_path) {
                clip.image_path = None;
            }
            clip
        })
        .collect();
    let mut metadata = script.metadata.clone();
    if scratch(&metadata.bgm_path) {
        metadata.bgm_path = None;
    }
    script.with_clips(clips).with_metadata(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitcom_script_model::{Clip, ScriptMetadata};

    #[test]
    fn test_portable_script_drops_scratch_paths() {
        let workdir = WorkDir::create(None).unwrap();
        let mut voiced = Clip::dialogue("Kermit", "Hi ho!");
        voiced.audio_path = Some(workdir.child("voice-000.wav"));
        voiced.audio_url = Some("https://bucket.example.com/media/kermit.wav".into());
        voiced.image_path = Some(PathBuf::from("/home/me/kermit.png"));
        let script = Script::new(
            vec![],
            vec![voiced],
            ScriptMetadata::default().with_bgm_path(Some(workdir.child("bgm.mp3"))),
        );

        let portable = portable_script(&script, &workdir);
        assert!(portable.clips[0].audio_path.is_none());
        assert_eq!(
            portable.clips[0].audio_url.as_deref(),
            Some("https://bucket.example.com/media/kermit.wav")
        );
        assert_eq!(
            portable.clips[0].image_path,
            Some(PathBuf::from("/home/me/kermit.png"))
        );
        assert!(portable.metadata.bgm_path.is_none());
    }
}
