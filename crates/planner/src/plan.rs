//! Per-clip render plans.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sitcom_script_model::{Clip, Script};

use crate::caption::CaptionLayout;
use crate::config::PlannerConfig;
use crate::fallback::pick_banner;
use crate::motion::Motion;
use crate::timing::{clip_seconds, speaking_delay_seconds};

/// Everything the renderer needs to encode one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlan {
    /// Position in the script.
    pub index: usize,

    /// Segment length in output seconds.
    pub duration_secs: f64,

    /// Silence before the audio starts, in output seconds.
    pub speaking_delay_secs: f64,

    /// Dialogue (or title) caption.
    pub caption: Option<CaptionLayout>,

    /// Placeholder text drawn over a black frame when the expected image
    /// is missing.
    pub banner: Option<String>,

    /// Pan/zoom for the image; `None` holds the frame still.
    pub motion: Option<Motion>,

    pub image_path: Option<PathBuf>,
    pub audio_path: Option<PathBuf>,
}

impl ClipPlan {
    /// Whether this clip renders the placeholder frame.
    pub fn is_fallback(&self) -> bool {
        self.banner.is_some()
    }
}

/// Derives [`ClipPlan`]s from resolved clips.
///
/// Randomness (motion, banners) comes from one generator so a seeded planner
/// reproduces a render exactly while an unseeded one varies between runs.
pub struct ClipPlanner {
    config: PlannerConfig,
    rng: StdRng,
}

impl ClipPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(config: PlannerConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan one clip given the length of its audio (if it has any).
    pub fn plan_clip(&mut self, index: usize, clip: &Clip, audio_secs: Option<f64>) -> ClipPlan {
        let duration_secs = clip_seconds(clip, audio_secs, &self.config);
        let caption = clip
            .caption_text()
            .and_then(|text| CaptionLayout::new(text, &self.config));

        let image_path = clip.image_path.clone();
        let banner = if image_path.is_none() && clip.expects_image() {
            tracing::warn!(clip = index, "No image resolved, rendering placeholder frame");
            Some(pick_banner(&mut self.rng).to_string())
        } else {
            None
        };

        let motion = if image_path.is_some() && self.config.motion.enabled {
            Some(Motion::synthesize(&mut self.rng, duration_secs, &self.config))
        } else {
            None
        };

        ClipPlan {
            index,
            duration_secs,
            speaking_delay_secs: speaking_delay_seconds(&self.config),
            caption,
            banner,
            motion,
            image_path,
            audio_path: clip.audio_path.clone(),
        }
    }

    /// Plan every clip in order. `audio_secs[i]` is the audio length of clip `i`.
    pub fn plan_script(&mut self, script: &Script, audio_secs: &[Option<f64>]) -> Vec<ClipPlan> {
        script
            .clips
            .iter()
            .enumerate()
            .map(|(i, clip)| {
                let audio = audio_secs.get(i).copied().flatten();
                self.plan_clip(i, clip, audio)
            })
            .collect()
    }
}
