//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Parent directory for per-run scratch directories.
    /// `None` uses the system temp directory.
    pub work_dir: Option<PathBuf>,

    /// Voice provider settings.
    pub voice: VoiceDefaults,

    /// Default render settings.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Voice provider endpoints and pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceDefaults {
    /// Base URL of the synthesis API.
    pub api_base_url: String,

    /// Base URL that returned audio paths are appended to.
    pub audio_base_url: String,

    /// Mean seconds between job submissions.
    pub job_delay_secs: f64,

    /// Jitter applied to the job delay (+/- seconds).
    pub job_jitter_secs: f64,

    /// Mean seconds between status polls.
    pub poll_delay_secs: f64,

    /// Jitter applied to the poll delay (+/- seconds).
    pub poll_jitter_secs: f64,

    /// Polls allowed per job before giving up.
    pub max_poll_attempts: u32,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Default render parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Short-side resolution (1080 means 1080x1920 in portrait).
    pub resolution: u32,

    /// "portrait", "landscape", or "square".
    pub orientation: String,

    /// Output frame rate.
    pub fps: u32,

    /// Audio codec: "mp3" or "aac".
    pub audio_codec: String,

    /// Font file used for captions.
    pub font: String,

    /// Whether still images get pan/zoom motion.
    pub pan_and_zoom: bool,

    /// Background music volume relative to narration, in `[0.0, 1.0]`.
    pub bgm_volume: f64,

    /// Video bitrate for the final output in kbps.
    pub video_bitrate_kbps: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "sitcom_voice=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_dir: None,
            voice: VoiceDefaults::default(),
            render: RenderDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for VoiceDefaults {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.fakeyou.com".to_string(),
            audio_base_url: "https://storage.googleapis.com/vocodes-public".to_string(),
            job_delay_secs: 30.0,
            job_jitter_secs: 3.0,
            poll_delay_secs: 10.0,
            poll_jitter_secs: 1.0,
            max_poll_attempts: 90,
            request_timeout_secs: 60,
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            resolution: 1080,
            orientation: "portrait".to_string(),
            fps: 24,
            audio_codec: "mp3".to_string(),
            font: "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".to_string(),
            pan_and_zoom: true,
            bgm_volume: 0.25,
            video_bitrate_kbps: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("sitcom").join("config.json")
}
