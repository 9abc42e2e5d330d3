//! Final concatenation and music mix.

use std::path::{Path, PathBuf};

use crate::command::FfmpegCommand;
use crate::config::RenderConfig;
use crate::filters::{self, MusicMix};

/// Build the encode that joins `segments` in order into `output`.
///
/// The music input is looped so short tracks still cover the whole video,
/// then trimmed to `total_secs`.
pub fn concat_command(
    segments: &[PathBuf],
    music: Option<&Path>,
    total_secs: f64,
    config: &RenderConfig,
    output: &Path,
) -> FfmpegCommand {
    let mut cmd = segments
        .iter()
        .fold(FfmpegCommand::new(output), |cmd, segment| cmd.input(segment));

    let mut mix = None;
    if let Some(path) = music {
        cmd = cmd.input_with(["-stream_loop", "-1"], path.to_string_lossy());
        mix = Some(MusicMix {
            input: segments.len(),
            volume: config.bgm_volume,
            total_secs,
        });
    }

    cmd.filter_complex(filters::concat_graph(segments.len(), mix))
        .map("[v]")
        .map("[a]")
        .video_codec("libx264")
        .preset(config.preset.clone())
        .output_args(["-pix_fmt", "yuv420p"])
        .frame_rate(config.fps)
        .video_bitrate_kbps(config.video_bitrate_kbps)
        .audio_codec(config.audio_codec.encoder())
        .output_args(["-movflags", "+faststart"])
        .duration(total_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_with_music() {
        let segments = vec![PathBuf::from("/w/seg0.mp4"), PathBuf::from("/w/seg1.mp4")];
        let cmd = concat_command(
            &segments,
            Some(Path::new("/w/bgm.mp3")),
            4.5,
            &RenderConfig::default(),
            Path::new("/w/final.mp4"),
        );
        let args = cmd.build_args();

        assert_eq!(cmd.input_count(), 3);
        let loop_at = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_at + 3], "/w/bgm.mp3");
        assert!(args.contains(&"8000k".to_string()));
        let graph_at = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert!(args[graph_at + 1].contains("[2:a]loudnorm"));
        assert_eq!(args.last().map(String::as_str), Some("/w/final.mp4"));
    }

    #[test]
    fn test_concat_without_music() {
        let segments = vec![PathBuf::from("/w/seg0.mp4")];
        let cmd = concat_command(
            &segments,
            None,
            1.5,
            &RenderConfig::default(),
            Path::new("/w/final.mp4"),
        );
        assert_eq!(cmd.input_count(), 1);
        assert!(!cmd.build_args().iter().any(|a| a.contains("amix")));
    }
}
