//! External document rendering.
//!
//! Turning a slide deck into pixels or PDF is delegated to an external
//! renderer. The exporter only depends on the [`DocumentRenderer`] trait,
//! so any implementation (a subprocess, a service client, a test double)
//! can be plugged in.
//!
//! # Example
//!
//! ```no_run
//! use certgen::convert::{DocumentRenderer, RenderFormat, SofficeRenderer};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let renderer = SofficeRenderer::locate()?.with_timeout(Duration::from_secs(30));
//! let png = renderer.render(Path::new("cert_001_Ana.pptx"), Path::new("out"), RenderFormat::Png)?;
//! println!("{}", png.display());
//! # Ok::<(), certgen::Error>(())
//! ```

mod soffice;

pub use soffice::SofficeRenderer;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Output format requested from a renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    /// Raster image of the first slide
    #[default]
    Png,

    /// PDF with one page per slide
    Pdf,
}

impl RenderFormat {
    /// File extension of the rendered output, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            RenderFormat::Png => "png",
            RenderFormat::Pdf => "pdf",
        }
    }
}

/// Trait for external document renderers.
///
/// `render` converts `input` into `out_dir/<input stem>.<format extension>`
/// and returns the path of the produced file.
pub trait DocumentRenderer: Send + Sync {
    /// Get the name of this renderer.
    fn name(&self) -> &str {
        "custom"
    }

    /// Render one document.
    fn render(&self, input: &Path, out_dir: &Path, format: RenderFormat) -> Result<PathBuf>;
}

impl<F> DocumentRenderer for F
where
    F: Fn(&Path, &Path, RenderFormat) -> Result<PathBuf> + Send + Sync,
{
    fn render(&self, input: &Path, out_dir: &Path, format: RenderFormat) -> Result<PathBuf> {
        self(input, out_dir, format)
    }
}

/// Expected output path for `input` rendered into `out_dir`.
pub fn expected_output(input: &Path, out_dir: &Path, format: RenderFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    out_dir.join(stem).with_extension(format.extension())
}
