use proptest::prelude::*;
use sitcom_planner::timing::{audio_driven_seconds, clip_seconds};
use sitcom_planner::{wrap_words, PlannerConfig, MAX_CLIP_SECONDS};
use sitcom_script_model::Clip;

fn config_with_speed(speed: f64) -> PlannerConfig {
    PlannerConfig {
        speed,
        ..PlannerConfig::default()
    }
}

proptest! {
    #[test]
    fn speaker_duration_is_monotone(a in 0.0f64..200.0, b in 0.0f64..200.0, speed in 0.25f64..4.0) {
        let config = config_with_speed(speed);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(audio_driven_seconds(lo, &config) <= audio_driven_seconds(hi, &config));
    }

    #[test]
    fn speaker_duration_is_bounded(audio in 0.0f64..500.0, speed in 0.01f64..4.0) {
        let config = config_with_speed(speed);
        let d = audio_driven_seconds(audio, &config);
        prop_assert!(d >= config.min_clip_seconds / speed - 1e-9);
        prop_assert!(d <= MAX_CLIP_SECONDS / speed + 1e-9);
    }

    #[test]
    fn speakerless_duration_is_divided_by_speed(duration in 0.1f64..300.0, speed in 0.25f64..4.0) {
        let config = config_with_speed(speed);
        let clip = Clip::title_card("card", duration);
        let planned = clip_seconds(&clip, None, &config);
        prop_assert!((planned - duration / speed).abs() < 1e-9);
    }

    #[test]
    fn wrapping_never_splits_words(
        words in proptest::collection::vec("[a-zA-Z,.!?']{1,40}", 0..30),
        width in 1usize..60,
    ) {
        let text = words.join(" ");
        let lines = wrap_words(&text, width);
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
        for line in &lines {
            let count = line.chars().count();
            prop_assert!(count <= width || !line.contains(' '));
        }
    }
}
