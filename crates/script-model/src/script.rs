//! The script aggregate and its TOML file format.
//!
//! ```toml
//! [[characters]]
//! name = "Kermit"
//! voice_token = "TM:xxxx"
//!
//! [[clips]]
//! speaker = "Kermit"
//! speech = "Hi ho!"
//! image_prompt = "a frog on a log"
//!
//! [metadata]
//! title = "Frog Talk"
//! ```
//!
//! Pipeline stages never mutate a [`Script`]; each one takes `&Script` and
//! returns a new value built with the `with_*` constructors.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::clip::Clip;

/// Whole-script information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Style keywords used to pick background music.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_style: Option<String>,

    /// Style keywords appended to image prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_style: Option<String>,

    /// The text the script was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_url: Option<String>,
}

impl ScriptMetadata {
    pub fn with_bgm_path(&self, path: Option<PathBuf>) -> Self {
        Self {
            bgm_path: path,
            ..self.clone()
        }
    }

    pub fn with_art_style(&self, art_style: Option<String>) -> Self {
        Self {
            art_style,
            ..self.clone()
        }
    }
}

/// Characters, clips in play order, and metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub characters: Vec<Character>,

    #[serde(default)]
    pub clips: Vec<Clip>,

    #[serde(default)]
    pub metadata: ScriptMetadata,
}

impl Script {
    pub fn new(characters: Vec<Character>, clips: Vec<Clip>, metadata: ScriptMetadata) -> Self {
        Self {
            characters,
            clips,
            metadata,
        }
    }

    /// Look up a character by exact name.
    pub fn find_character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn with_clips(&self, clips: Vec<Clip>) -> Self {
        Self {
            clips,
            ..self.clone()
        }
    }

    pub fn with_metadata(&self, metadata: ScriptMetadata) -> Self {
        Self {
            metadata,
            ..self.clone()
        }
    }

    /// Replace every clip's `audio_path` with the positionally matching entry.
    pub fn with_audio_paths(&self, paths: Vec<Option<PathBuf>>) -> Result<Self, ScriptError> {
        self.check_aligned("audio", paths.len())?;
        let clips = self
            .clips
            .iter()
            .zip(paths)
            .map(|(clip, path)| clip.with_audio_path(path))
            .collect();
        Ok(self.with_clips(clips))
    }

    /// Replace every clip's `image_path` with the positionally matching entry.
    pub fn with_image_paths(&self, paths: Vec<Option<PathBuf>>) -> Result<Self, ScriptError> {
        self.check_aligned("image", paths.len())?;
        let clips = self
            .clips
            .iter()
            .zip(paths)
            .map(|(clip, path)| clip.with_image_path(path))
            .collect();
        Ok(self.with_clips(clips))
    }

    fn check_aligned(&self, what: &str, len: usize) -> Result<(), ScriptError> {
        if len != self.clips.len() {
            return Err(ScriptError::validation(format!(
                "{what} paths not aligned with clips: got {len}, script has {}",
                self.clips.len()
            )));
        }
        Ok(())
    }

    /// Parse a script from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ScriptError> {
        toml::from_str(text).map_err(|e| ScriptError::Parse {
            path: PathBuf::from("<inline>"),
            source: e,
        })
    }

    /// Serialize to TOML. Absent optional fields are omitted.
    pub fn to_toml_string(&self) -> Result<String, ScriptError> {
        toml::to_string_pretty(self).map_err(|e| ScriptError::Serialize { source: e })
    }

    /// Load a script file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ScriptError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the script to disk, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ScriptError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|e| ScriptError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Report problems that would degrade or break a render.
    ///
    /// Issues are advisory; an empty list means the script looks complete.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.clips.is_empty() {
            issues.push("script has no clips".to_string());
        }

        for (i, clip) in self.clips.iter().enumerate() {
            let n = i + 1;
            match (&clip.speaker, clip.duration) {
                (None, None) => {
                    issues.push(format!("clip {n}: no speaker and no duration"));
                }
                (_, Some(d)) if !(d.is_finite() && d > 0.0) => {
                    issues.push(format!("clip {n}: duration must be positive, got {d}"));
                }
                _ => {}
            }
            if let Some(speaker) = &clip.speaker {
                if self.find_character(speaker).is_none() {
                    issues.push(format!(
                        "clip {n}: speaker '{speaker}' is not a listed character (a narrator voice will be used)"
                    ));
                }
            }
            if clip.image_path.is_some() && clip.image_url.is_some() {
                issues.push(format!("clip {n}: both image_path and image_url are set"));
            }
            if clip.audio_path.is_some() && clip.audio_url.is_some() {
                issues.push(format!("clip {n}: both audio_path and audio_url are set"));
            }
            if let Some(path) = &clip.image_path {
                if !path.exists() {
                    issues.push(format!("clip {n}: image file {} not found", path.display()));
                }
            }
            if let Some(path) = &clip.audio_path {
                if !path.exists() {
                    issues.push(format!("clip {n}: audio file {} not found", path.display()));
                }
            }
        }

        if let Some(path) = &self.metadata.bgm_path {
            if !path.exists() {
                issues.push(format!("music file {} not found", path.display()));
            }
        }

        issues
    }
}

/// Errors from loading, saving, or rebuilding scripts.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize script: {source}")]
    Serialize { source: toml::ser::Error },

    #[error("Invalid script: {message}")]
    Validation { message: String },
}

impl ScriptError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Script {
        Script::new(
            vec![Character::new("Kermit", "TM:kermit")],
            vec![
                Clip::title_card("Frog Talk", 2.5),
                Clip {
                    image_prompt: Some("a frog on a log".into()),
                    ..Clip::dialogue("Kermit", "Hi ho!")
                },
                Clip::dialogue("Stranger", "Who are you?"),
            ],
            ScriptMetadata {
                title: Some("Frog Talk".into()),
                bgm_style: Some("upbeat".into()),
                ..ScriptMetadata::default()
            },
        )
    }

    #[test]
    fn test_parse_script_file() {
        let text = r#"
[[characters]]
name = "Kermit"
voice_token = "TM:kermit"

[[clips]]
title = "Frog Talk"
duration = 2.5

[[clips]]
speaker = "Kermit"
speech = "Hi ho!"

[metadata]
title = "Frog Talk"
art_style = "watercolor"
"#;
        let script = Script::from_toml_str(text).unwrap();
        assert_eq!(script.characters.len(), 1);
        assert_eq!(script.clips.len(), 2);
        assert_eq!(script.clips[0].duration, Some(2.5));
        assert_eq!(script.clips[1].speaker.as_deref(), Some("Kermit"));
        assert!(script.clips[1].audio_path.is_none());
        assert_eq!(script.metadata.art_style.as_deref(), Some("watercolor"));
        assert!(script.metadata.bgm_path.is_none());
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let text = Script::new(vec![], vec![Clip::title_card("x", 1.0)], Default::default())
            .to_toml_string()
            .unwrap();
        assert!(!text.contains("speaker"));
        assert!(!text.contains("audio_path"));
        assert!(text.contains("duration"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("script.toml");
        let script = sample();
        script.save(&path).unwrap();
        assert_eq!(Script::load(&path).unwrap(), script);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Script::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }

    #[test]
    fn test_parse_error_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[[clips]\nspeaker = ").unwrap();
        let err = Script::load(&path).unwrap_err();
        assert!(matches!(err, ScriptError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_with_audio_paths_aligned() {
        let script = sample();
        let updated = script
            .with_audio_paths(vec![None, Some("a.wav".into()), Some("b.wav".into())])
            .unwrap();
        assert_eq!(updated.clips[1].audio_path, Some(PathBuf::from("a.wav")));
        assert!(updated.clips[0].audio_path.is_none());
        assert!(script.clips[1].audio_path.is_none());
    }

    #[test]
    fn test_with_paths_rejects_misaligned() {
        let script = sample();
        let err = script.with_audio_paths(vec![None]).unwrap_err();
        assert!(matches!(err, ScriptError::Validation { .. }));
        assert!(script.with_image_paths(vec![None; 4]).is_err());
    }

    #[test]
    fn test_find_character() {
        let script = sample();
        assert!(script.find_character("Kermit").is_some());
        assert!(script.find_character("kermit").is_none());
    }

    #[test]
    fn test_validate_reports_issues() {
        let script = Script::new(
            vec![],
            vec![
                Clip::default(),
                Clip {
                    image_path: Some("/nope/img.png".into()),
                    image_url: Some("https://example.com/img.png".into()),
                    ..Clip::title_card("t", -1.0)
                },
            ],
            ScriptMetadata::default(),
        );
        let issues = script.validate();
        assert!(issues.iter().any(|i| i.contains("no speaker and no duration")));
        assert!(issues.iter().any(|i| i.contains("duration must be positive")));
        assert!(issues.iter().any(|i| i.contains("both image_path and image_url")));
        assert!(issues.iter().any(|i| i.contains("not found")));
    }

    #[test]
    fn test_validate_clean_script() {
        let script = Script::new(
            vec![Character::new("Kermit", "TM:kermit")],
            vec![Clip::title_card("Hi", 1.0), Clip::dialogue("Kermit", "Hi ho!")],
            ScriptMetadata::default(),
        );
        assert!(script.validate().is_empty());
    }
}
