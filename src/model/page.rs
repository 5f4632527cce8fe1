//! Page-level types.

use super::{Paragraph, TextRun};
use serde::{Deserialize, Serialize};

/// A single slide of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, presentation order)
    pub number: u32,

    /// Package part holding the slide XML (e.g. `ppt/slides/slide1.xml`)
    pub part_name: String,

    /// Text regions on the page, in document order
    pub regions: Vec<TextRegion>,
}

impl Page {
    /// Create a new page without text.
    pub fn new(number: u32, part_name: impl Into<String>) -> Self {
        Self {
            number,
            part_name: part_name.into(),
            regions: Vec::new(),
        }
    }

    /// Add a text region.
    pub fn add_region(&mut self, region: TextRegion) {
        self.regions.push(region);
    }

    /// Iterate over every run on the page.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.regions
            .iter()
            .flat_map(|r| r.paragraphs.iter())
            .flat_map(|p| p.runs.iter())
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.regions
            .iter()
            .map(|r| r.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page has no text regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// A text frame: a shape's text body or a table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Paragraphs in the region
    pub paragraphs: Vec<Paragraph>,
}

impl TextRegion {
    /// Create a new empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get plain text content of the region.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
