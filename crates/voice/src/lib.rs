//! Sitcom Simulator Voice Synthesis
//!
//! Gives every spoken clip a local audio file:
//! - **Provider:** job-based remote TTS behind [`SynthesisApi`] ([`FakeYouClient`])
//! - **Orchestrator:** sequential submit/poll/download with randomized pacing
//! - **Catalog:** narrator voices for speakers the script does not list
//! - **Debug:** offline tone stand-ins sized to the line length

pub mod backoff;
pub mod catalog;
pub mod debug;
pub mod engine;
pub mod orchestrator;
pub mod provider;

pub use backoff::BackoffPolicy;
pub use catalog::VoiceCatalog;
pub use debug::DebugVoice;
pub use engine::VoiceEngine;
pub use orchestrator::{VoiceCallback, VoiceOrchestrator};
pub use provider::{FakeYouClient, JobStatus, SynthesisApi};
