//! Planner configuration.

/// Hard ceiling on any speaker clip's planned length, in seconds.
///
/// Guards against a malformed or looping audio asset producing an absurdly
/// long segment.
pub const MAX_CLIP_SECONDS: f64 = 60.0;

/// Reference frame width that pixel-based defaults are expressed against.
pub const REFERENCE_WIDTH: f64 = 720.0;

/// Timing and layout parameters for a render.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Hold after the speaker finishes (seconds).
    pub buffer_seconds: f64,

    /// Delay between the cut and the first word (seconds).
    pub speaking_delay_seconds: f64,

    /// Shortest allowed speaker clip (seconds).
    pub min_clip_seconds: f64,

    /// Global playback speed multiplier (> 0).
    pub speed: f64,

    /// Maximum caption line length in characters.
    pub caption_max_width: usize,

    /// Output frame size in pixels.
    pub width: u32,
    pub height: u32,

    pub motion: MotionConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            buffer_seconds: 0.15,
            speaking_delay_seconds: 0.12,
            min_clip_seconds: 1.5,
            speed: 1.0,
            caption_max_width: 30,
            width: 1080,
            height: 1920,
            motion: MotionConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Speed multiplier, falling back to 1.0 for non-positive or NaN input.
    pub fn effective_speed(&self) -> f64 {
        if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            1.0
        }
    }

    /// Output width relative to the 720 px reference.
    pub fn scale(&self) -> f64 {
        self.width as f64 / REFERENCE_WIDTH
    }
}

/// Pan/zoom synthesis parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    /// Whether still images get motion at all.
    pub enabled: bool,

    /// Zoom band; 1.0 shows the whole (cropped) frame.
    pub min_zoom: f64,
    pub max_zoom: f64,

    /// Maximum pan speed per axis, in pixels per second at 720 px width.
    pub max_pan_speed: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_zoom: 1.0,
            max_zoom: 1.3,
            max_pan_speed: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert!((config.buffer_seconds - 0.15).abs() < 1e-9);
        assert!((config.speaking_delay_seconds - 0.12).abs() < 1e-9);
        assert!((config.min_clip_seconds - 1.5).abs() < 1e-9);
        assert_eq!(config.caption_max_width, 30);
        assert!((config.scale() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_effective_speed_guards_bad_input() {
        let mut config = PlannerConfig::default();
        config.speed = 0.0;
        assert_eq!(config.effective_speed(), 1.0);
        config.speed = f64::NAN;
        assert_eq!(config.effective_speed(), 1.0);
        config.speed = 1.25;
        assert_eq!(config.effective_speed(), 1.25);
    }
}
