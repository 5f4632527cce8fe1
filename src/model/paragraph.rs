//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A paragraph of text runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in document order
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Get the concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// A run of text with consistent formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content (unescaped)
    pub text: String,

    /// Formatting of the run
    pub style: RunStyle,

    /// Location of the run's text body in the slide part it came from
    #[serde(skip)]
    pub(crate) span: Option<TextSpan>,
}

impl TextRun {
    /// Create a detached run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
            span: None,
        }
    }

    /// Create a detached run with the given style.
    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            span: None,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the run is backed by a text body in a slide part.
    pub fn is_attached(&self) -> bool {
        self.span.is_some()
    }
}

/// Byte range of a `<a:t>` body inside a part, with its original escaped content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextSpan {
    pub range: Range<usize>,
    pub raw: String,
}

/// Character formatting of a run.
///
/// `None` means the value is inherited from the paragraph, shape or master.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStyle {
    /// Latin typeface name
    pub font_name: Option<String>,

    /// Font size in points
    pub size: Option<f32>,

    /// Bold flag
    pub bold: Option<bool>,

    /// Italic flag
    pub italic: Option<bool>,

    /// Solid fill color as `RRGGBB` hex
    pub color: Option<String>,
}

impl RunStyle {
    /// Check if any explicit formatting is set.
    pub fn has_styling(&self) -> bool {
        self.font_name.is_some()
            || self.size.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.color.is_some()
    }
}
