//! Caption wrapping and placement.

use crate::config::PlannerConfig;

/// Font size at the 720 px reference width.
pub const REFERENCE_FONT_SIZE: f64 = 42.0;

/// Caption baseline sits this fraction of the frame height above the bottom.
pub const BOTTOM_OFFSET_RATIO: f64 = 6.0 / 24.0;

/// Caption text broken into lines plus its on-screen placement.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub lines: Vec<String>,
    /// Font size in pixels for the output width.
    pub font_size: f64,
    /// Fraction of the frame height between the caption centre and the bottom.
    pub bottom_offset_ratio: f64,
}

impl CaptionLayout {
    /// Lay out `text` for the configured width. `None` for blank text.
    pub fn new(text: &str, config: &PlannerConfig) -> Option<Self> {
        let lines = wrap_words(text, config.caption_max_width);
        if lines.is_empty() {
            return None;
        }
        Some(Self {
            lines,
            font_size: REFERENCE_FONT_SIZE * config.scale(),
            bottom_offset_ratio: BOTTOM_OFFSET_RATIO,
        })
    }

    /// Lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Greedy word wrap to at most `max_width` characters per line.
///
/// Words are never split or hyphenated; a word longer than `max_width`
/// occupies a line of its own.
pub fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
