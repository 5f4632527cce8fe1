//! Document-level types.

use super::{Page, Recipient, TextRun};
use crate::error::{Error, Result};
use crate::pptx::{self, Package};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// English Metric Units per inch.
pub const EMU_PER_INCH: u64 = 914_400;

/// Slide dimensions as stored in `ppt/presentation.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in EMU
    pub width_emu: u64,

    /// Height in EMU
    pub height_emu: u64,
}

impl PageSize {
    /// Create a page size from EMU values.
    pub fn from_emu(width_emu: u64, height_emu: u64) -> Self {
        Self {
            width_emu,
            height_emu,
        }
    }

    /// Create a page size from points (1/72 inch).
    pub fn from_points(width: f32, height: f32) -> Self {
        let to_emu = |pt: f32| (pt as f64 / 72.0 * EMU_PER_INCH as f64).round() as u64;
        Self::from_emu(to_emu(width), to_emu(height))
    }

    /// PowerPoint's 4:3 default (10 x 7.5 inches).
    pub fn standard() -> Self {
        Self::from_emu(9_144_000, 6_858_000)
    }

    /// PowerPoint's 16:9 default (13.333 x 7.5 inches).
    pub fn widescreen() -> Self {
        Self::from_emu(12_192_000, 6_858_000)
    }

    /// Width in points.
    pub fn width_pt(&self) -> f32 {
        (self.width_emu as f64 / EMU_PER_INCH as f64 * 72.0) as f32
    }

    /// Height in points.
    pub fn height_pt(&self) -> f32 {
        (self.height_emu as f64 / EMU_PER_INCH as f64 * 72.0) as f32
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width_pt() / self.height_pt()
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width_emu > self.height_emu
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::standard()
    }
}

/// A certificate template read from a `.pptx` file.
///
/// Templates are read-only. Personalization deep-copies the page
/// structure; the raw package parts are immutable and shared.
#[derive(Debug, Clone)]
pub struct Template {
    /// Slide size
    pub page_size: PageSize,

    /// Slides in presentation order
    pub pages: Vec<Page>,

    pub(crate) package: Arc<Package>,
}

impl Template {
    /// Read a template from `.pptx` bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        pptx::read_template(data)
    }

    /// Read a template from a `.pptx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Iterate over every run on every page.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.runs())
    }

    /// Number of runs carrying at least one placeholder token.
    pub fn placeholder_count(&self) -> usize {
        self.runs()
            .filter(|r| crate::personalize::contains_placeholder(&r.text))
            .count()
    }

    /// Paragraphs whose text contains a placeholder that no single run holds.
    ///
    /// Such tokens were split across runs by the editor and will not be
    /// substituted. Returns `(page number, paragraph text)` pairs.
    pub fn split_placeholders(&self) -> Vec<(u32, String)> {
        let mut found = Vec::new();
        for page in &self.pages {
            for paragraph in page.regions.iter().flat_map(|r| r.paragraphs.iter()) {
                let text = paragraph.plain_text();
                for token in crate::personalize::TOKENS {
                    let whole = text.matches(token).count();
                    let in_runs: usize = paragraph
                        .runs
                        .iter()
                        .map(|r| r.text.matches(token).count())
                        .sum();
                    if whole > in_runs {
                        found.push((page.number, text.clone()));
                        break;
                    }
                }
            }
        }
        found
    }

    /// Summarize the template.
    pub fn info(&self) -> TemplateInfo {
        TemplateInfo {
            page_size: self.page_size,
            width_pt: self.page_size.width_pt(),
            height_pt: self.page_size.height_pt(),
            page_count: self.page_count(),
            placeholder_runs: self.placeholder_count(),
            split_placeholders: self
                .split_placeholders()
                .into_iter()
                .map(|(page, text)| SplitPlaceholder { page, text })
                .collect(),
            pages: self.pages.clone(),
        }
    }
}

/// Serializable summary of a template, as shown by `certgen inspect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    /// Slide size in EMU
    pub page_size: PageSize,

    /// Slide width in points
    pub width_pt: f32,

    /// Slide height in points
    pub height_pt: f32,

    /// Number of slides
    pub page_count: u32,

    /// Runs holding at least one placeholder
    pub placeholder_runs: usize,

    /// Placeholders that will not be substituted
    pub split_placeholders: Vec<SplitPlaceholder>,

    /// Text structure of every slide
    pub pages: Vec<Page>,
}

/// A placeholder token split across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPlaceholder {
    /// 1-based slide number
    pub page: u32,

    /// Paragraph text
    pub text: String,
}

impl TemplateInfo {
    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };

        result.map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
    }
}

/// One template copy personalized for a single recipient.
#[derive(Debug, Clone)]
pub struct PersonalizedDocument {
    /// Recipient this copy was made for
    pub recipient: Recipient,

    /// Slide size, copied from the template
    pub page_size: PageSize,

    /// Personalized pages
    pub pages: Vec<Page>,

    pub(crate) package: Arc<Package>,
}

impl PersonalizedDocument {
    /// Iterate over every run on every page.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.runs())
    }

    /// Get plain text content of the whole document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Serialize to `.pptx` bytes.
    pub fn to_pptx_bytes(&self) -> Result<Vec<u8>> {
        pptx::write_document(self)
    }

    /// Unique file stem: `<stem>_<index>_<slug>`, index zero-padded to `width`.
    pub fn file_stem(&self, stem: &str, width: usize) -> String {
        format!(
            "{}_{:0width$}_{}",
            stem,
            self.recipient.index,
            self.recipient.slug(),
            width = width
        )
    }

    /// Write the document as `<dir>/<file_stem>.pptx`.
    pub fn save(&self, dir: &Path, stem: &str, width: usize) -> Result<PathBuf> {
        let path = dir.join(format!("{}.pptx", self.file_stem(stem, width)));
        fs::write(&path, self.to_pptx_bytes()?)?;
        Ok(path)
    }
}

/// Zero-padding width for `count` numbered files (at least 3 digits).
pub fn index_width(count: usize) -> usize {
    count.to_string().len().max(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_points() {
        let size = PageSize::standard();
        assert!((size.width_pt() - 720.0).abs() < 0.01);
        assert!((size.height_pt() - 540.0).abs() < 0.01);
        assert!(size.is_landscape());

        let wide = PageSize::widescreen();
        assert!((wide.aspect_ratio() - 16.0 / 9.0).abs() < 0.001);
    }

    #[test]
    fn test_page_size_from_points() {
        let size = PageSize::from_points(720.0, 540.0);
        assert_eq!(size, PageSize::standard());
    }

    #[test]
    fn test_index_width() {
        assert_eq!(index_width(1), 3);
        assert_eq!(index_width(999), 3);
        assert_eq!(index_width(1000), 4);
    }

    #[test]
    fn test_template_info_json() {
        let slide = r#"<p:sld><p:txBody><a:p><a:r><a:t>[NA</a:t></a:r><a:r><a:t>ME]</a:t></a:r></a:p><a:p><a:r><a:t>[DATE]</a:t></a:r></a:p></p:txBody></p:sld>"#;
        let template = Template {
            page_size: PageSize::widescreen(),
            pages: vec![pptx::parse_slide(slide, 1, "ppt/slides/slide1.xml")],
            package: Arc::new(Package::default()),
        };

        let info = template.info();
        assert_eq!(info.page_count, 1);
        assert_eq!(info.placeholder_runs, 1);
        assert_eq!(
            info.split_placeholders,
            vec![SplitPlaceholder {
                page: 1,
                text: "[NAME]".into()
            }]
        );

        let json = info.to_json(false).unwrap();
        assert!(json.contains("\"page_count\":1"));
        assert!(json.contains("\"split_placeholders\":[{\"page\":1,\"text\":\"[NAME]\"}]"));
    }
}
