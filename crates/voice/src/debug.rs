//! Offline stand-in voice for fast iteration.
//!
//! Produces a quiet mono tone per spoken clip, long enough to roughly match
//! how long the line would take to say. No network access.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use sitcom_common::{SitcomError, SitcomResult, WorkDir};
use sitcom_script_model::Script;

use crate::orchestrator::VoiceCallback;

const SAMPLE_RATE: u32 = 22_050;
const TONE_HZ: f64 = 220.0;
const AMPLITUDE: f64 = 800.0;

/// Debug voice engine writing 16-bit PCM WAV files.
pub struct DebugVoice {
    seconds_per_word: f64,
    min_seconds: f64,
    on_voice: Option<VoiceCallback>,
}

impl Default for DebugVoice {
    fn default() -> Self {
        Self {
            seconds_per_word: 0.3,
            min_seconds: 0.5,
            on_voice: None,
        }
    }
}

impl DebugVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_voice(mut self, callback: VoiceCallback) -> Self {
        self.on_voice = Some(callback);
        self
    }

    /// Length of the stand-in audio for `text`.
    pub fn duration_for(&self, text: &str) -> f64 {
        let words = text.split_whitespace().count() as f64;
        (words * self.seconds_per_word).max(self.min_seconds)
    }

    pub async fn add_voices(&self, script: &Script, workdir: &WorkDir) -> SitcomResult<Script> {
        let mut paths = Vec::with_capacity(script.clips.len());
        for (index, clip) in script.clips.iter().enumerate() {
            let path = match (&clip.speaker, &clip.audio_path, clip.spoken_text()) {
                (None, _, _) => None,
                (Some(_), Some(existing), _) => Some(existing.clone()),
                (Some(_), None, None) => None,
                (Some(_), None, Some(text)) => {
                    let path = workdir.scratch_file(&format!("voice-{index:03}-"), ".wav")?;
                    write_tone_wav(&path, self.duration_for(text)).await?;
                    tracing::debug!(clip = index, path = %path.display(), "Generated debug voice");
                    if let Some(callback) = &self.on_voice {
                        callback(index, &path);
                    }
                    Some(path)
                }
            };
            paths.push(path);
        }
        script
            .with_audio_paths(paths)
            .map_err(|e| SitcomError::script(e.to_string()))
    }
}

/// Write a mono 16-bit PCM WAV of `seconds` length.
async fn write_tone_wav(path: &Path, seconds: f64) -> SitcomResult<PathBuf> {
    let bytes = tone_wav_bytes(seconds).map_err(std::io::Error::other)?;
    tokio::fs::write(path, bytes).await?;
    Ok(path.to_path_buf())
}

fn tone_wav_bytes(seconds: f64) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let samples = (seconds * SAMPLE_RATE as f64).round() as u32;

    let mut bytes = Vec::new();
    let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec)?;
    for n in 0..samples {
        let t = n as f64 / SAMPLE_RATE as f64;
        let sample = (AMPLITUDE * (2.0 * std::f64::consts::PI * TONE_HZ * t).sin()) as i16;
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitcom_script_model::{Clip, ScriptMetadata};

    #[test]
    fn test_duration_scales_with_words() {
        let voice = DebugVoice::new();
        assert!((voice.duration_for("one two three four") - 1.2).abs() < 1e-9);
        assert!((voice.duration_for("hi") - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_writes_wav_per_spoken_clip() {
        let workdir = WorkDir::create(None).unwrap();
        let script = Script::new(
            vec![],
            vec![
                Clip::dialogue("A", "one two three four five six seven eight nine ten"),
                Clip::title_card("card", 1.0),
                Clip::dialogue("B", ""),
            ],
            ScriptMetadata::default(),
        );

        let voiced = DebugVoice::new().add_voices(&script, &workdir).await.unwrap();
        let path = voiced.clips[0].audio_path.as_ref().unwrap();
        let reader = hound::WavReader::open(path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(spec.bits_per_sample, 16);
        // 3 seconds of audio
        assert_eq!(reader.duration(), 3 * 22_050);
        assert!(voiced.clips[1].audio_path.is_none());
        assert!(voiced.clips[2].audio_path.is_none());
    }
}
