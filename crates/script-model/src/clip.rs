//! A single timeline unit of a script.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One clip of the video: a line of dialogue, a title card, or a still.
///
/// Every field is optional. A clip with a `speaker` takes its length from
/// the synthesized audio; a clip without one must carry `duration`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,

    /// Description handed to an image generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// Title text, shown as the caption when there is no speech.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Explicit length in seconds for speaker-less clips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Clip {
    /// A line of dialogue.
    pub fn dialogue(speaker: impl Into<String>, speech: impl Into<String>) -> Self {
        Self {
            speaker: Some(speaker.into()),
            speech: Some(speech.into()),
            ..Self::default()
        }
    }

    /// A title card shown for a fixed number of seconds.
    pub fn title_card(title: impl Into<String>, duration: f64) -> Self {
        Self {
            title: Some(title.into()),
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Non-empty speech text, if any.
    pub fn spoken_text(&self) -> Option<&str> {
        self.speech
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Has speech but neither a local audio file nor an audio URL.
    pub fn needs_audio(&self) -> bool {
        self.spoken_text().is_some() && self.audio_path.is_none() && self.audio_url.is_none()
    }

    /// Has an image prompt but neither a local image nor an image URL.
    pub fn needs_image(&self) -> bool {
        self.image_prompt.is_some() && self.image_path.is_none() && self.image_url.is_none()
    }

    /// Whether the clip was meant to show an image.
    pub fn expects_image(&self) -> bool {
        self.image_prompt.is_some() || self.image_url.is_some() || self.image_path.is_some()
    }

    /// Text to burn in as the caption: speech, else title.
    pub fn caption_text(&self) -> Option<&str> {
        self.spoken_text().or_else(|| {
            self.title
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
    }

    pub fn with_audio_path(&self, path: Option<PathBuf>) -> Self {
        Self {
            audio_path: path,
            ..self.clone()
        }
    }

    pub fn with_image_path(&self, path: Option<PathBuf>) -> Self {
        Self {
            image_path: path,
            ..self.clone()
        }
    }

    /// Where the clip's audio can be fetched again without re-synthesis.
    pub fn with_audio_url(&self, url: Option<String>) -> Self {
        Self {
            audio_url: url,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_audio() {
        let clip = Clip::dialogue("Kermit", "Hi ho!");
        assert!(clip.needs_audio());

        let voiced = clip.with_audio_path(Some(PathBuf::from("/tmp/a.wav")));
        assert!(!voiced.needs_audio());
        assert!(clip.audio_path.is_none(), "original clip must be untouched");

        let remote = clip.with_audio_url(Some("https://example.com/a.wav".into()));
        assert!(!remote.needs_audio());
        assert!(clip.audio_url.is_none());

        let blank = Clip::dialogue("Kermit", "   ");
        assert!(!blank.needs_audio());
    }

    #[test]
    fn test_needs_image() {
        let clip = Clip {
            image_prompt: Some("a frog on a log".into()),
            ..Clip::default()
        };
        assert!(clip.needs_image());
        assert!(clip.expects_image());
        assert!(!clip.with_image_path(Some("frog.png".into())).needs_image());
        assert!(!Clip::default().expects_image());
    }

    #[test]
    fn test_caption_falls_back_to_title() {
        assert_eq!(Clip::title_card("The End", 2.0).caption_text(), Some("The End"));
        let clip = Clip {
            title: Some("ignored".into()),
            ..Clip::dialogue("A", "spoken")
        };
        assert_eq!(clip.caption_text(), Some("spoken"));
        assert_eq!(Clip::default().caption_text(), None);
    }
}
