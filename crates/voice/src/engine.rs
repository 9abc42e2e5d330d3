//! Voice engine selection.

use sitcom_common::{SitcomResult, WorkDir};
use sitcom_script_model::Script;

use crate::debug::DebugVoice;
use crate::orchestrator::VoiceOrchestrator;

/// The voice source for a run, chosen once when the pipeline is built.
pub enum VoiceEngine {
    Remote(VoiceOrchestrator),
    Debug(DebugVoice),
}

impl VoiceEngine {
    pub fn name(&self) -> &str {
        match self {
            Self::Remote(orchestrator) => orchestrator.provider_name(),
            Self::Debug(_) => "debug",
        }
    }

    /// Return a copy of `script` with audio paths for every spoken clip.
    pub async fn add_voices(&self, script: &Script, workdir: &WorkDir) -> SitcomResult<Script> {
        match self {
            Self::Remote(orchestrator) => orchestrator.add_voices(script, workdir).await,
            Self::Debug(debug) => debug.add_voices(script, workdir).await,
        }
    }
}
