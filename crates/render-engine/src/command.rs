//! ffmpeg command construction and the encoder backend.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use sitcom_common::{SitcomError, SitcomResult};

use crate::probe;

/// One `-i` input with the options that precede it.
#[derive(Debug, Clone, PartialEq)]
struct Input {
    args: Vec<String>,
    source: String,
}

/// Builder for a multi-input ffmpeg invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    filter_complex: Option<String>,
    output_args: Vec<String>,
    output: PathBuf,
    log_level: String,
}

impl FfmpegCommand {
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            filter_complex: None,
            output_args: Vec::new(),
            output: output.as_ref().to_path_buf(),
            log_level: "error".to_string(),
        }
    }

    /// Add a file input.
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        self.input_with(Vec::<String>::new(), path.as_ref().to_string_lossy())
    }

    /// Add an input preceded by input options (e.g. `-loop 1`).
    pub fn input_with<I, S>(mut self, args: I, source: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(Input {
            args: args.into_iter().map(Into::into).collect(),
            source: source.into(),
        });
        self
    }

    /// Add a generated input from the lavfi device.
    pub fn lavfi(self, graph: impl Into<String>) -> Self {
        self.input_with(["-f", "lavfi"], graph)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn filter_complex(mut self, graph: impl Into<String>) -> Self {
        self.filter_complex = Some(graph.into());
        self
    }

    /// Map a stream or filter label into the output.
    pub fn map(self, label: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(label)
    }

    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    pub fn frame_rate(self, fps: u32) -> Self {
        self.output_arg("-r").output_arg(fps.to_string())
    }

    pub fn video_bitrate_kbps(self, kbps: u32) -> Self {
        self.output_arg("-b:v").output_arg(format!("{kbps}k"))
    }

    /// Limit output length.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{seconds:.3}"))
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Full argument list (without the program name).
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-v".to_string(),
            self.log_level.clone(),
        ];
        for input in &self.inputs {
            args.extend(input.args.iter().cloned());
            args.push("-i".to_string());
            args.push(input.source.clone());
        }
        if let Some(graph) = &self.filter_complex {
            args.push("-filter_complex".to_string());
            args.push(graph.clone());
        }
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

/// Encoder used by the renderer.
#[async_trait::async_trait]
pub trait RenderBackend: Send + Sync {
    /// Run one encode. `context` names the step in errors and logs.
    async fn run(&self, context: &str, command: &FfmpegCommand) -> SitcomResult<()>;

    /// Length of a media file in seconds.
    async fn probe_duration(&self, path: &Path) -> SitcomResult<f64>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Runs the `ffmpeg` and `ffprobe` binaries found on `PATH`.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg: Option<PathBuf>,
    ffprobe: Option<PathBuf>,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self {
            ffmpeg: which::which("ffmpeg").ok(),
            ffprobe: which::which("ffprobe").ok(),
        }
    }
}

#[async_trait::async_trait]
impl RenderBackend for FfmpegBackend {
    async fn run(&self, context: &str, command: &FfmpegCommand) -> SitcomResult<()> {
        let ffmpeg = self
            .ffmpeg
            .as_ref()
            .ok_or_else(|| SitcomError::unsupported("ffmpeg not found in PATH"))?;
        let args = command.build_args();
        tracing::debug!(context, args = ?args, "Running ffmpeg");

        let start = std::time::Instant::now();
        let output = tokio::process::Command::new(ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SitcomError::encode(context, format!("failed to start ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::error!(context, status = %output.status, "ffmpeg failed");
            return Err(SitcomError::encode(context, stderr));
        }

        tracing::debug!(
            context,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "ffmpeg finished"
        );
        Ok(())
    }

    async fn probe_duration(&self, path: &Path) -> SitcomResult<f64> {
        let ffprobe = self
            .ffprobe
            .as_ref()
            .ok_or_else(|| SitcomError::unsupported("ffprobe not found in PATH"))?;
        probe::probe_duration(ffprobe, path).await
    }

    fn is_available(&self) -> bool {
        self.ffmpeg.is_some() && self.ffprobe.is_some()
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}
