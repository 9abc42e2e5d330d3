//! Output configuration.

use std::path::PathBuf;
use std::str::FromStr;

use sitcom_common::{RenderDefaults, SitcomError, SitcomResult};
use sitcom_planner::config::REFERENCE_WIDTH;

/// Frame aspect of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// 9:16
    #[default]
    Portrait,
    /// 16:9
    Landscape,
    /// 1:1
    Square,
}

impl Orientation {
    /// Frame size for a short-side `resolution`, rounded to even numbers.
    pub fn dimensions(&self, resolution: u32) -> (u32, u32) {
        let short = even(resolution.max(2));
        let long = even((short as u64 * 16 / 9) as u32);
        match self {
            Self::Portrait => (short, long),
            Self::Landscape => (long, short),
            Self::Square => (short, short),
        }
    }
}

impl FromStr for Orientation {
    type Err = SitcomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" | "vertical" => Ok(Self::Portrait),
            "landscape" | "horizontal" => Ok(Self::Landscape),
            "square" => Ok(Self::Square),
            other => Err(SitcomError::config(format!(
                "unknown orientation '{other}' (expected portrait, landscape, or square)"
            ))),
        }
    }
}

/// How captions are set off from the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionStyle {
    /// Translucent black box behind the text.
    #[default]
    Box,
    /// Drop shadow only.
    Shadow,
}

/// Audio codec for segments and the final file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioCodec {
    #[default]
    Mp3,
    Aac,
}

impl AudioCodec {
    /// ffmpeg encoder name.
    pub fn encoder(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Aac => "aac",
        }
    }
}

impl FromStr for AudioCodec {
    type Err = SitcomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "aac" => Ok(Self::Aac),
            other => Err(SitcomError::config(format!(
                "unknown audio codec '{other}' (expected mp3 or aac)"
            ))),
        }
    }
}

/// Output configuration for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Short-side resolution in pixels.
    pub resolution: u32,
    pub orientation: Orientation,
    pub fps: u32,
    pub caption_style: CaptionStyle,
    pub audio_codec: AudioCodec,
    pub video_bitrate_kbps: u32,
    /// Font file for captions and banners.
    pub font: PathBuf,
    /// Background music level relative to narration.
    pub bgm_volume: f64,
    /// x264 preset.
    pub preset: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: 1080,
            orientation: Orientation::Portrait,
            fps: 24,
            caption_style: CaptionStyle::Box,
            audio_codec: AudioCodec::Mp3,
            video_bitrate_kbps: 8000,
            font: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            bgm_volume: 0.25,
            preset: "superfast".to_string(),
        }
    }
}

impl RenderConfig {
    /// Config from the `render` section of the application config.
    pub fn from_defaults(defaults: &RenderDefaults) -> SitcomResult<Self> {
        Ok(Self {
            resolution: defaults.resolution,
            orientation: defaults.orientation.parse()?,
            fps: defaults.fps.max(1),
            audio_codec: defaults.audio_codec.parse()?,
            video_bitrate_kbps: defaults.video_bitrate_kbps,
            font: PathBuf::from(&defaults.font),
            bgm_volume: defaults.bgm_volume.clamp(0.0, 1.0),
            ..Self::default()
        })
    }

    /// Output frame size.
    pub fn dimensions(&self) -> (u32, u32) {
        self.orientation.dimensions(self.resolution)
    }

    /// Output width relative to the planner's reference width.
    pub fn scale(&self) -> f64 {
        self.dimensions().0 as f64 / REFERENCE_WIDTH
    }
}

fn even(n: u32) -> u32 {
    n - n % 2
}
