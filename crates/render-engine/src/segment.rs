//! Per-clip segment encoding.
//!
//! Every segment carries exactly one video and one audio stream of the
//! planned length, which is what the concat step requires.

use std::path::{Path, PathBuf};

use sitcom_planner::ClipPlan;

use crate::command::FfmpegCommand;
use crate::config::RenderConfig;
use crate::filters;

/// Text files `drawtext` reads the caption and banner from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFiles {
    pub caption: Option<PathBuf>,
    pub banner: Option<PathBuf>,
}

/// Number of frames a clip occupies.
pub fn frame_count(duration_secs: f64, fps: u32) -> u32 {
    (duration_secs.max(0.0) * fps as f64).ceil().max(1.0) as u32
}

/// Build the encode for one clip.
pub fn segment_command(
    plan: &ClipPlan,
    config: &RenderConfig,
    speed: f64,
    overlays: &OverlayFiles,
    output: &Path,
) -> FfmpegCommand {
    let (width, height) = config.dimensions();
    let fps = config.fps;
    let duration = plan.duration_secs;
    let scale = config.scale();

    let mut cmd = FfmpegCommand::new(output);
    let mut video = Vec::new();

    // input 0: picture
    match (&plan.image_path, &plan.motion) {
        (Some(image), Some(motion)) => {
            cmd = cmd.input(image);
            video.push(filters::cover(width, height));
            video.push(filters::zoompan(
                motion,
                width,
                height,
                frame_count(duration, fps),
                fps,
            ));
        }
        (Some(image), None) => {
            cmd = cmd.input_with(
                ["-loop".to_string(), "1".to_string(), "-framerate".to_string(), fps.to_string()],
                image.to_string_lossy(),
            );
            video.push(filters::cover(width, height));
        }
        (None, _) => {
            cmd = cmd.lavfi(filters::black_source(width, height, fps, duration));
        }
    }
    video.push("format=yuv420p".to_string());

    if let Some(banner) = &overlays.banner {
        video.push(filters::banner_drawtext(banner, &config.font, scale));
    }
    if let (Some(layout), Some(caption)) = (&plan.caption, &overlays.caption) {
        video.push(filters::caption_drawtext(
            layout,
            caption,
            &config.font,
            config.caption_style,
            scale,
        ));
    }

    // input 1: sound
    let audio = match &plan.audio_path {
        Some(audio) => {
            cmd = cmd.input(audio);
            filters::narration_chain(speed, plan.speaking_delay_secs, duration)
        }
        None => {
            cmd = cmd.lavfi(filters::silence_source());
            filters::audio_format()
        }
    };

    let graph = format!("[0:v]{}[v];[1:a]{audio}[a]", video.join(","));

    cmd.filter_complex(graph)
        .map("[v]")
        .map("[a]")
        .video_codec("libx264")
        .preset(config.preset.clone())
        .output_args(["-pix_fmt", "yuv420p"])
        .frame_rate(fps)
        .audio_codec(config.audio_codec.encoder())
        .output_args(["-ar".to_string(), filters::SAMPLE_RATE.to_string()])
        .duration(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitcom_planner::{CaptionLayout, Motion, PlannerConfig};

    fn plan() -> ClipPlan {
        ClipPlan {
            index: 0,
            duration_secs: 2.0,
            speaking_delay_secs: 0.12,
            caption: CaptionLayout::new("Hi ho", &PlannerConfig::default()),
            banner: None,
            motion: None,
            image_path: None,
            audio_path: None,
        }
    }

    fn graph_of(cmd: &FfmpegCommand) -> String {
        let args = cmd.build_args();
        let at = args.iter().position(|a| a == "-filter_complex").unwrap();
        args[at + 1].clone()
    }

    #[test]
    fn test_frame_count_rounds_up() {
        assert_eq!(frame_count(2.0, 24), 48);
        assert_eq!(frame_count(2.01, 24), 49);
        assert_eq!(frame_count(0.0, 24), 1);
    }

    #[test]
    fn test_black_frame_with_silence() {
        let overlays = OverlayFiles {
            caption: Some("/w/cap.txt".into()),
            banner: Some("/w/banner.txt".into()),
        };
        let cmd = segment_command(
            &ClipPlan {
                banner: Some("[IMAGE REMOVED]".into()),
                ..plan()
            },
            &RenderConfig::default(),
            1.0,
            &overlays,
            Path::new("/w/seg.mp4"),
        );
        let args = cmd.build_args();
        assert!(args.iter().any(|a| a.starts_with("color=c=black:s=1080x1920")));
        assert!(args.iter().any(|a| a.starts_with("anullsrc=")));
        let graph = graph_of(&cmd);
        let banner_at = graph.find("banner.txt").unwrap();
        let caption_at = graph.find("cap.txt").unwrap();
        assert!(banner_at < caption_at);
        assert!(args.ends_with(&["-t".to_string(), "2.000".to_string(), "/w/seg.mp4".to_string()]));
    }

    #[test]
    fn test_image_with_motion_and_voice() {
        let cmd = segment_command(
            &ClipPlan {
                image_path: Some("/img/a.png".into()),
                audio_path: Some("/voice/a.wav".into()),
                motion: Some(Motion {
                    zoom_start: 1.0,
                    zoom_end: 1.3,
                    pan_x: 10.0,
                    pan_y: 0.0,
                }),
                ..plan()
            },
            &RenderConfig::default(),
            2.0,
            &OverlayFiles::default(),
            Path::new("/w/seg.mp4"),
        );
        let args = cmd.build_args();
        assert!(!args.contains(&"-loop".to_string()));
        let graph = graph_of(&cmd);
        assert!(graph.contains("zoompan="));
        assert!(graph.contains("atempo=2.000000,adelay=120|120"));
        assert!(!graph.contains("drawtext"), "no caption file means no caption");
    }

    #[test]
    fn test_still_image_loops() {
        let cmd = segment_command(
            &ClipPlan {
                image_path: Some("/img/a.png".into()),
                ..plan()
            },
            &RenderConfig::default(),
            1.0,
            &OverlayFiles::default(),
            Path::new("/w/seg.mp4"),
        );
        let args = cmd.build_args();
        let loop_at = args.iter().position(|a| a == "-loop").unwrap();
        assert_eq!(args[loop_at + 1], "1");
        assert!(!graph_of(&cmd).contains("zoompan"));
    }
}
