//! Procedural pan/zoom ("Ken Burns") motion for still images.

use rand::Rng;

use crate::config::PlannerConfig;

/// Camera motion across one clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Zoom factor at the first frame (1.0 = full frame).
    pub zoom_start: f64,
    /// Zoom factor at the last frame.
    pub zoom_end: f64,
    /// Total horizontal drift of the view centre over the clip, in output pixels.
    pub pan_x: f64,
    /// Total vertical drift of the view centre over the clip, in output pixels.
    pub pan_y: f64,
}

impl Motion {
    /// No movement.
    pub const STILL: Motion = Motion {
        zoom_start: 1.0,
        zoom_end: 1.0,
        pan_x: 0.0,
        pan_y: 0.0,
    };

    pub fn is_still(&self) -> bool {
        (self.zoom_start - 1.0).abs() < f64::EPSILON
            && (self.zoom_end - 1.0).abs() < f64::EPSILON
            && self.pan_x == 0.0
            && self.pan_y == 0.0
    }

    /// Random motion for a clip lasting `duration_secs`.
    ///
    /// Both zoom endpoints come from the configured band and are swapped at
    /// random (zoom in vs. zoom out). Pan speed per axis is uniform within
    /// `±max_pan_speed` scaled to the output width, then multiplied by the
    /// clip length.
    pub fn synthesize<R: Rng + ?Sized>(rng: &mut R, duration_secs: f64, config: &PlannerConfig) -> Self {
        let motion = &config.motion;
        let lo = motion.min_zoom.min(motion.max_zoom).max(1.0);
        let hi = motion.min_zoom.max(motion.max_zoom).max(lo);

        let a = rng.gen_range(lo..=hi);
        let b = rng.gen_range(lo..=hi);
        let (zoom_start, zoom_end) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };

        let max_speed = motion.max_pan_speed.abs() * config.scale();
        let duration = duration_secs.max(0.0);
        let mut pan = || {
            if max_speed > 0.0 {
                rng.gen_range(-max_speed..=max_speed) * duration
            } else {
                0.0
            }
        };
        let pan_x = pan();
        let pan_y = pan();

        Self {
            zoom_start,
            zoom_end,
            pan_x,
            pan_y,
        }
    }
}
