//! Sequential, paced synthesis of every spoken line in a script.
//!
//! Per clip:
//!
//! ```text
//! resolve voice ─▶ submit ─▶ [sleep poll delay ─▶ poll]* ─▶ download
//!                    ▲                                          │
//!                    └──── wait out the rest of the job window ◀┘
//! ```
//!
//! Jobs never overlap and always run in script order. Any provider error
//! aborts the whole run: a spoken line is never silently dropped.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sitcom_assets::AssetFetcher;
use sitcom_common::{Clock, SitcomError, SitcomResult, WorkDir};
use sitcom_script_model::{Clip, Script};

use crate::backoff::BackoffPolicy;
use crate::catalog::VoiceCatalog;
use crate::provider::{JobStatus, SynthesisApi};

/// Callback invoked with `(clip_index, audio_path)` after each clip's audio
/// is on disk.
pub type VoiceCallback = Box<dyn Fn(usize, &Path) + Send + Sync>;

/// A clip's audio on disk, plus the provider URL it came from when it was
/// synthesized in this run.
struct Voice {
    path: PathBuf,
    url: Option<String>,
}

impl Voice {
    fn local(path: PathBuf) -> Self {
        Self { path, url: None }
    }
}

/// Drives a [`SynthesisApi`] through a whole script.
pub struct VoiceOrchestrator {
    api: Arc<dyn SynthesisApi>,
    fetcher: AssetFetcher,
    catalog: VoiceCatalog,
    backoff: BackoffPolicy,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    on_voice: Option<VoiceCallback>,
}

impl VoiceOrchestrator {
    pub fn new(
        api: Arc<dyn SynthesisApi>,
        fetcher: AssetFetcher,
        catalog: VoiceCatalog,
        backoff: BackoffPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            fetcher,
            catalog,
            backoff,
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
            on_voice: None,
        }
    }

    /// Fix the random source (narrator choice and jitter).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn on_voice(mut self, callback: VoiceCallback) -> Self {
        self.on_voice = Some(callback);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.api.name()
    }

    /// Return a copy of `script` with every spoken clip's `audio_path` set.
    ///
    /// Freshly synthesized clips also get the provider's `audio_url`, so a
    /// saved copy of the script can be replayed without new jobs.
    pub async fn add_voices(&self, script: &Script, workdir: &WorkDir) -> SitcomResult<Script> {
        let voices = self.synthesize(script, workdir).await?;
        let clips = script
            .clips
            .iter()
            .zip(voices)
            .map(|(clip, voice)| match voice {
                Some(Voice { path, url: Some(url) }) => {
                    clip.with_audio_path(Some(path)).with_audio_url(Some(url))
                }
                Some(Voice { path, url: None }) => clip.with_audio_path(Some(path)),
                None => clip.clone(),
            })
            .collect();
        Ok(script.with_clips(clips))
    }

    /// Audio file per clip, aligned with `script.clips`.
    pub async fn generate(
        &self,
        script: &Script,
        workdir: &WorkDir,
    ) -> SitcomResult<Vec<Option<PathBuf>>> {
        let voices = self.synthesize(script, workdir).await?;
        Ok(voices.into_iter().map(|v| v.map(|v| v.path)).collect())
    }

    async fn synthesize(
        &self,
        script: &Script,
        workdir: &WorkDir,
    ) -> SitcomResult<Vec<Option<Voice>>> {
        let total = script.clips.iter().filter(|c| c.needs_audio()).count();
        tracing::info!(
            provider = self.api.name(),
            clips = script.clips.len(),
            to_synthesize = total,
            "Generating voices"
        );

        let mut voices = Vec::with_capacity(script.clips.len());
        let mut pace: Option<Duration> = None;

        for (index, clip) in script.clips.iter().enumerate() {
            let voice = self
                .voice_for_clip(index, clip, script, workdir, &mut pace)
                .await?;
            if let (Some(voice), Some(callback)) = (&voice, &self.on_voice) {
                if clip.audio_path.is_none() {
                    callback(index, &voice.path);
                }
            }
            voices.push(voice);
        }

        Ok(voices)
    }

    async fn voice_for_clip(
        &self,
        index: usize,
        clip: &Clip,
        script: &Script,
        workdir: &WorkDir,
        pace: &mut Option<Duration>,
    ) -> SitcomResult<Option<Voice>> {
        let Some(speaker) = clip.speaker.as_deref() else {
            return Ok(None);
        };
        if let Some(existing) = &clip.audio_path {
            return Ok(Some(Voice::local(existing.clone())));
        }
        let Some(text) = clip.spoken_text() else {
            tracing::debug!(clip = index, speaker, "Speaker without speech, no audio");
            return Ok(None);
        };
        if let Some(url) = &clip.audio_url {
            let path = self.materialize(index, url, workdir).await?;
            return Ok(Some(Voice::local(path)));
        }

        if let Some(wait) = pace.take() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Pacing before next job");
            self.clock.sleep(wait).await;
        }

        let voice_token = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.catalog
                .resolve(script, speaker, &mut *rng)
                .voice_token
                .clone()
        };

        let job_token = self.api.submit(&voice_token, text).await?;
        tracing::info!(clip = index, speaker, job = %job_token, "Submitted voice job");

        let polling_started = self.clock.elapsed();
        let window = self.draw(|rng| self.backoff.next_job_window(rng));
        let audio_path = self.poll_until_complete(index, &job_token).await?;
        let spent = self.clock.elapsed().saturating_sub(polling_started);
        *pace = Some(window.saturating_sub(spent));

        let url = self.api.result_url(&audio_path);
        let path = self.materialize(index, &url, workdir).await?;
        tracing::info!(
            clip = index,
            job = %job_token,
            path = %path.display(),
            "Voice ready"
        );
        Ok(Some(Voice {
            path,
            url: Some(url),
        }))
    }

    async fn poll_until_complete(&self, index: usize, job_token: &str) -> SitcomResult<String> {
        for attempt in 1..=self.backoff.max_poll_attempts {
            let delay = self.draw(|rng| self.backoff.next_poll_delay(rng));
            self.clock.sleep(delay).await;

            match self.api.poll(job_token).await? {
                JobStatus::Pending | JobStatus::Started => {
                    tracing::debug!(clip = index, job = job_token, attempt, "Voice job still running");
                }
                JobStatus::Unavailable { reason } => {
                    tracing::warn!(clip = index, job = job_token, attempt, %reason, "Job status unavailable, will retry");
                }
                JobStatus::Complete { audio_path } => return Ok(audio_path),
                JobStatus::Failed { status } => {
                    tracing::error!(clip = index, job = job_token, %status, "Voice job failed");
                    return Err(SitcomError::job_failed(job_token, status));
                }
            }
        }

        Err(SitcomError::PollTimedOut {
            job_token: job_token.to_string(),
            attempts: self.backoff.max_poll_attempts,
        })
    }

    /// Download a voice file. Failure is fatal for spoken lines.
    async fn materialize(&self, index: usize, url: &str, workdir: &WorkDir) -> SitcomResult<PathBuf> {
        self.fetcher
            .download_to(url, workdir, &format!("voice-{index:03}-"), "wav")
            .await
            .map_err(|e| {
                tracing::error!(clip = index, url, error = %e, "Voice download failed");
                e
            })
    }

    fn draw<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}
