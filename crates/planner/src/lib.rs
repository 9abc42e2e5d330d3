//! Sitcom Simulator Planner
//!
//! Derives the presentational parameters of every clip:
//! - **Timing:** segment length from audio length, buffers, and speed
//! - **Captions:** word-boundary wrapping, font size, and placement
//! - **Motion:** random pan/zoom per still image
//! - **Fallback:** placeholder banner for clips whose image is missing
//!
//! This crate is pure computation. No I/O; audio lengths are passed in.

pub mod caption;
pub mod config;
pub mod fallback;
pub mod motion;
pub mod plan;
pub mod timing;

pub use caption::{wrap_words, CaptionLayout};
pub use config::{MotionConfig, PlannerConfig, MAX_CLIP_SECONDS};
pub use motion::Motion;
pub use plan::{ClipPlan, ClipPlanner};
