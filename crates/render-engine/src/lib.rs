//! Sitcom Simulator Render Engine
//!
//! Turns a fully resolved script (local images, audio and music) into a
//! single video file by driving ffmpeg.
//!
//! # Pipeline Architecture
//!
//! ```text
//! clip 0: image ──┐
//!         audio ──┼── zoompan / caption / banner ──▶ segment-000.mp4 ──┐
//!         plan  ──┘                                                    │
//! clip 1: ...                                     ▶ segment-001.mp4 ──┤
//!                                                                     ├── concat
//! background music (looped, trimmed, ducked) ────────────────────────┘     │
//!                                                                           ▼
//!                                                                    Encode (H.264)
//!                                                                           │
//!                                                                           ▼
//!                                                                      output.mp4
//! ```

pub mod command;
pub mod concat;
pub mod config;
pub mod filters;
pub mod pipeline;
pub mod probe;
pub mod segment;

pub use command::{FfmpegBackend, FfmpegCommand, RenderBackend};
pub use config::{AudioCodec, CaptionStyle, Orientation, RenderConfig};
pub use pipeline::{
    sanitize_output_path, sibling_script_path, ProgressCallback, RenderProgress, RenderStage,
    Renderer,
};
pub use probe::command_exists;
