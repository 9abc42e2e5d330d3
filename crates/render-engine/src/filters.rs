//! Filtergraph fragments.
//!
//! Everything here is string building. Values that come from the outside
//! world (font and text file paths) go through [`quote`]; caption text itself
//! is never inlined, it is read by `drawtext` from a file.

use std::path::Path;

use sitcom_planner::{CaptionLayout, Motion};

use crate::config::CaptionStyle;

/// Sample rate every segment's audio is normalized to.
pub const SAMPLE_RATE: u32 = 44_100;

/// Quote a filter option value.
///
/// Single quotes protect `:` `,` `;` and brackets; an embedded quote closes
/// the quoted run, emits an escaped quote, and reopens it.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

/// `atempo` stages for `speed`, each inside ffmpeg's supported 0.5..=2.0 range.
pub fn atempo_chain(speed: f64) -> Vec<String> {
    if !speed.is_finite() || speed <= 0.0 || (speed - 1.0).abs() < 1e-9 {
        return Vec::new();
    }
    let mut remaining = speed;
    let mut stages = Vec::new();
    while remaining > 2.0 {
        stages.push("atempo=2.0".to_string());
        remaining /= 2.0;
    }
    while remaining < 0.5 {
        stages.push("atempo=0.5".to_string());
        remaining /= 0.5;
    }
    stages.push(format!("atempo={remaining:.6}"));
    stages
}

/// Fill the frame: scale up to cover, then centre-crop.
pub fn cover(width: u32, height: u32) -> String {
    format!(
        "scale={width}:{height}:force_original_aspect_ratio=increase,crop={width}:{height},setsar=1"
    )
}

/// Pan/zoom over a single still frame, producing `frames` frames.
///
/// Zoom moves linearly from start to end. The view centre drifts linearly by
/// the motion's pan offset and is clamped so the view never leaves the image.
pub fn zoompan(motion: &Motion, width: u32, height: u32, frames: u32, fps: u32) -> String {
    let n = frames.max(1);
    let zs = motion.zoom_start;
    let ze = motion.zoom_end;
    format!(
        "zoompan=z='{zs:.4}+({ze:.4}-{zs:.4})*on/{n}'\
         :x='max(0,min(iw-iw/zoom,(iw-iw/zoom)/2+({px:.2})*on/{n}))'\
         :y='max(0,min(ih-ih/zoom,(ih-ih/zoom)/2+({py:.2})*on/{n}))'\
         :d={n}:s={width}x{height}:fps={fps}",
        px = motion.pan_x,
        py = motion.pan_y,
    )
}

/// Solid black source for clips without an image.
pub fn black_source(width: u32, height: u32, fps: u32, duration: f64) -> String {
    format!("color=c=black:s={width}x{height}:r={fps}:d={duration:.3}")
}

/// Silent stereo source for clips without audio.
pub fn silence_source() -> String {
    format!("anullsrc=channel_layout=stereo:sample_rate={SAMPLE_RATE}")
}

/// Normalize any audio stream to the common segment format.
pub fn audio_format() -> String {
    format!("aformat=sample_rates={SAMPLE_RATE}:channel_layouts=stereo")
}

/// EBU R128 loudness normalization.
pub fn loudnorm() -> &'static str {
    "loudnorm=I=-16:TP=-1.5:LRA=11"
}

/// Voice track: speed change, speaking delay, loudness, pad to `duration`.
pub fn narration_chain(speed: f64, delay_secs: f64, duration: f64) -> String {
    let delay_ms = (delay_secs.max(0.0) * 1000.0).round() as u64;
    let mut stages = atempo_chain(speed);
    stages.push(format!("adelay={delay_ms}|{delay_ms}"));
    stages.push(loudnorm().to_string());
    stages.push(format!("aresample={SAMPLE_RATE}"));
    stages.push(audio_format());
    stages.push(format!("apad=whole_dur={duration:.3}"));
    stages.join(",")
}

/// Dialogue caption near the bottom of the frame.
pub fn caption_drawtext(
    layout: &CaptionLayout,
    text_file: &Path,
    font: &Path,
    style: CaptionStyle,
    scale: f64,
) -> String {
    let font_size = layout.font_size.round().max(1.0) as u32;
    let style = match style {
        CaptionStyle::Box => format!(
            ":box=1:boxcolor=black@0.5:boxborderw={}",
            (10.0 * scale).round() as u32
        ),
        CaptionStyle::Shadow => format!(
            ":shadowcolor=black@0.6:shadowx={}:shadowy={}",
            (-4.0 * scale).round() as i32,
            (4.0 * scale).round() as i32
        ),
    };
    format!(
        "drawtext=fontfile={}:textfile={}:expansion=none:fontsize={font_size}:fontcolor=white\
         :line_spacing={}:x=(w-text_w)/2:y=(h-text_h/2)-h*{:.4}{style}",
        quote_path(font),
        quote_path(text_file),
        (font_size / 5).max(1),
        layout.bottom_offset_ratio,
    )
}

/// Placeholder banner near the top of a black frame.
pub fn banner_drawtext(text_file: &Path, font: &Path, scale: f64) -> String {
    let font_size = (46.0 * scale).round() as u32;
    format!(
        "drawtext=fontfile={}:textfile={}:expansion=none:fontsize={font_size}:fontcolor=white\
         :box=1:boxcolor=red@0.85:boxborderw={}:x=(w-text_w)/2:y=h*0.12",
        quote_path(font),
        quote_path(text_file),
        (14.0 * scale).round() as u32,
    )
}

/// Concatenate `segments` inputs (each one video + one audio stream) and,
/// when `music` is given, mix in the music input trimmed to `total_secs`.
///
/// Produces the labels `[v]` and `[a]`.
pub fn concat_graph(segments: usize, music: Option<MusicMix>) -> String {
    let mut graph: String = (0..segments).map(|i| format!("[{i}:v][{i}:a]")).collect();
    graph.push_str(&format!("concat=n={segments}:v=1:a=1[v][narr]"));

    match music {
        Some(mix) => graph.push_str(&format!(
            ";[{input}:a]{loudnorm},aresample={SAMPLE_RATE},{format},volume={volume:.3},\
             atrim=duration={total:.3},asetpts=PTS-STARTPTS[bgm]\
             ;[narr][bgm]amix=inputs=2:duration=first:dropout_transition=0,volume=2[a]",
            input = mix.input,
            loudnorm = loudnorm(),
            format = audio_format(),
            volume = mix.volume,
            total = mix.total_secs,
        )),
        None => graph.push_str(";[narr]anull[a]"),
    }
    graph
}

/// Background music placement in the concat graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicMix {
    /// Input index of the music file.
    pub input: usize,
    pub volume: f64,
    pub total_secs: f64,
}
