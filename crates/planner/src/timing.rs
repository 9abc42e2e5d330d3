//! Clip duration rules.

use sitcom_script_model::Clip;

use crate::config::{PlannerConfig, MAX_CLIP_SECONDS};

/// Planned length of a clip whose timing follows its audio.
///
/// `min(max(audio + buffer + speaking_delay, min_clip), MAX_CLIP_SECONDS) / speed`.
///
/// The cap applies in source time, so the result always lies within
/// `[min_clip / speed, MAX_CLIP_SECONDS / speed]`.
pub fn audio_driven_seconds(audio_secs: f64, config: &PlannerConfig) -> f64 {
    let audio = if audio_secs.is_finite() && audio_secs > 0.0 {
        audio_secs
    } else {
        0.0
    };
    let held = (audio + config.buffer_seconds + config.speaking_delay_seconds)
        .max(config.min_clip_seconds);
    held.min(MAX_CLIP_SECONDS) / config.effective_speed()
}

/// Planned length of `clip` in output seconds.
///
/// Speaker-less clips with an explicit positive `duration` use it verbatim
/// (divided by speed). Everything else derives from the audio length.
pub fn clip_seconds(clip: &Clip, audio_secs: Option<f64>, config: &PlannerConfig) -> f64 {
    if clip.speaker.is_none() {
        if let Some(duration) = clip.duration.filter(|d| d.is_finite() && *d > 0.0) {
            return duration / config.effective_speed();
        }
        if audio_secs.is_none() {
            tracing::warn!(
                title = clip.title.as_deref().unwrap_or(""),
                "Clip has neither speaker nor duration, holding for the minimum length"
            );
        }
    }
    audio_driven_seconds(audio_secs.unwrap_or(0.0), config)
}

/// Speaking delay in output time.
pub fn speaking_delay_seconds(config: &PlannerConfig) -> f64 {
    config.speaking_delay_seconds / config.effective_speed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_short_audio_gets_minimum() {
        let config = PlannerConfig::default();
        assert!(approx(audio_driven_seconds(0.5, &config), 1.5));
    }

    #[test]
    fn test_audio_plus_buffer_and_delay() {
        let config = PlannerConfig::default();
        assert!(approx(audio_driven_seconds(3.0, &config), 3.27));
    }

    #[test]
    fn test_cap_then_divide_by_speed() {
        let config = PlannerConfig {
            speed: 2.0,
            ..PlannerConfig::default()
        };
        assert!(approx(audio_driven_seconds(3.73, &config), 2.0));
        assert!(approx(audio_driven_seconds(100.0, &config), MAX_CLIP_SECONDS / 2.0));
        assert!(approx(audio_driven_seconds(500.0, &config), MAX_CLIP_SECONDS / 2.0));
    }

    #[test]
    fn test_slow_speed_keeps_minimum() {
        let config = PlannerConfig {
            speed: 0.02,
            ..PlannerConfig::default()
        };
        assert!(approx(audio_driven_seconds(0.0, &config), 1.5 / 0.02));
    }

    #[test]
    fn test_speakerless_duration_is_verbatim() {
        let config = PlannerConfig {
            speed: 1.25,
            ..PlannerConfig::default()
        };
        let clip = Clip::title_card("Later that day", 2.5);
        assert!(approx(clip_seconds(&clip, None, &config), 2.0));
        // explicit durations are not capped
        let long = Clip::title_card("Credits", 100.0);
        assert!(approx(clip_seconds(&long, None, &config), 80.0));
    }

    #[test]
    fn test_speaker_ignores_duration_field() {
        let config = PlannerConfig::default();
        let clip = Clip {
            duration: Some(9.0),
            ..Clip::dialogue("Kermit", "Hi")
        };
        assert!(approx(clip_seconds(&clip, Some(2.0), &config), 2.27));
    }

    #[test]
    fn test_speakerless_without_duration_uses_minimum() {
        let config = PlannerConfig::default();
        assert!(approx(clip_seconds(&Clip::default(), None, &config), 1.5));
    }

    #[test]
    fn test_speaking_delay_follows_speed() {
        let config = PlannerConfig {
            speed: 2.0,
            ..PlannerConfig::default()
        };
        assert!(approx(speaking_delay_seconds(&config), 0.06));
    }
}
