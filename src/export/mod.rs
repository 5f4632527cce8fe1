//! Packaging personalized documents into a single deliverable.
//!
//! Three shapes are supported:
//!
//! - a merged PDF with one letterboxed page per recipient;
//! - a ZIP of the personalized `.pptx` files;
//! - a ZIP of per-recipient PDFs.
//!
//! All intermediate files live in a private temporary directory that is
//! removed when the export returns, successfully or not.

mod archive;
mod deliverable;
pub mod layout;
mod options;
pub mod pdf;

pub use archive::ArchiveBuilder;
pub use deliverable::{Deliverable, DeliverableKind};
pub use layout::{letterbox, Placement};
pub use options::{ExportMode, ExportOptions, ARCHIVE_FILE_NAME, MERGED_FILE_NAME};
pub use pdf::{PdfImage, PdfWriter};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::convert::{DocumentRenderer, RenderFormat};
use crate::error::{Error, Result};
use crate::model::{index_width, PersonalizedDocument};

/// Builds deliverables from personalized documents.
///
/// # Example
///
/// ```no_run
/// use certgen::convert::SofficeRenderer;
/// use certgen::export::{ExportMode, ExportOptions, Exporter};
/// use std::sync::Arc;
///
/// # fn docs() -> Vec<certgen::PersonalizedDocument> { Vec::new() }
/// let exporter = Exporter::new(ExportOptions::new().with_mode(ExportMode::Merged))
///     .with_renderer(Arc::new(SofficeRenderer::locate()?));
/// let deliverable = exporter.export(&docs())?;
/// deliverable.persist("All_Certificates.pdf")?;
/// # Ok::<(), certgen::Error>(())
/// ```
pub struct Exporter {
    options: ExportOptions,
    renderer: Option<Arc<dyn DocumentRenderer>>,
}

impl Exporter {
    /// Create an exporter without a renderer.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            renderer: None,
        }
    }

    /// Set the renderer used by the rendering modes.
    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Get the export options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Package `docs` according to the configured mode.
    pub fn export(&self, docs: &[PersonalizedDocument]) -> Result<Deliverable> {
        if docs.is_empty() {
            return Err(Error::Packaging("no documents to export".into()));
        }

        log::info!(
            "Exporting {} documents as {:?}",
            docs.len(),
            self.options.mode
        );

        let deliverable = match self.options.mode {
            ExportMode::Merged => self.export_merged(docs)?,
            ExportMode::Archive => self.export_archive(docs)?,
            ExportMode::RenderedArchive => self.export_rendered_archive(docs)?,
        };

        log::info!(
            "Built {} ({} units, {} bytes)",
            deliverable.file_name,
            deliverable.units,
            deliverable.len()
        );
        Ok(deliverable)
    }

    fn export_merged(&self, docs: &[PersonalizedDocument]) -> Result<Deliverable> {
        let renderer = self.renderer()?;
        let work = Workspace::new()?;
        let width = index_width(docs.len());

        let page = self.options.page_size.unwrap_or(docs[0].page_size);
        let (page_width, page_height) = (page.width_pt(), page.height_pt());
        let mut writer = PdfWriter::new(page_width, page_height).with_title("All Certificates");

        for doc in docs {
            let wrap = |e: Error| e.for_recipient(doc.recipient.index, &doc.recipient.name);

            let source = doc
                .save(work.sources(), &self.options.entry_stem, width)
                .map_err(wrap)?;
            let png = self
                .render_with_retry(renderer, &source, work.rendered(), RenderFormat::Png)
                .map_err(wrap)?;
            let image = load_image(&png).map_err(wrap)?;

            let placement = letterbox(image.width(), image.height(), page_width, page_height);
            writer.add_image_page(image, placement);
        }

        let units = writer.page_count();
        Ok(Deliverable {
            kind: DeliverableKind::MergedPdf,
            file_name: self.options.file_name().to_string(),
            bytes: writer.finish()?,
            units,
        })
    }

    fn export_archive(&self, docs: &[PersonalizedDocument]) -> Result<Deliverable> {
        let width = index_width(docs.len());
        let mut archive = ArchiveBuilder::new();

        for doc in docs {
            let wrap = |e: Error| e.for_recipient(doc.recipient.index, &doc.recipient.name);
            let bytes = doc.to_pptx_bytes().map_err(wrap)?;
            let name = format!("{}.pptx", doc.file_stem(&self.options.entry_stem, width));
            archive.add_entry(&name, &bytes).map_err(wrap)?;
        }

        let units = archive.len();
        Ok(Deliverable {
            kind: DeliverableKind::Archive,
            file_name: self.options.file_name().to_string(),
            bytes: archive.finish()?,
            units,
        })
    }

    fn export_rendered_archive(&self, docs: &[PersonalizedDocument]) -> Result<Deliverable> {
        let renderer = self.renderer()?;
        let work = Workspace::new()?;
        let width = index_width(docs.len());
        let mut archive = ArchiveBuilder::new();

        for doc in docs {
            let wrap = |e: Error| e.for_recipient(doc.recipient.index, &doc.recipient.name);

            let source = doc
                .save(work.sources(), &self.options.entry_stem, width)
                .map_err(wrap)?;
            let pdf = self
                .render_with_retry(renderer, &source, work.rendered(), RenderFormat::Pdf)
                .map_err(wrap)?;
            let bytes = fs::read(&pdf).map_err(|e| wrap(e.into()))?;

            let name = format!("{}.pdf", doc.file_stem(&self.options.entry_stem, width));
            archive.add_entry(&name, &bytes).map_err(wrap)?;
        }

        let units = archive.len();
        Ok(Deliverable {
            kind: DeliverableKind::Archive,
            file_name: self.options.file_name().to_string(),
            bytes: archive.finish()?,
            units,
        })
    }

    fn renderer(&self) -> Result<&dyn DocumentRenderer> {
        self.renderer.as_deref().ok_or_else(|| {
            Error::RendererUnavailable(format!(
                "{:?} export needs a document renderer",
                self.options.mode
            ))
        })
    }

    /// Render once, retrying transient failures up to `options.retries` times.
    fn render_with_retry(
        &self,
        renderer: &dyn DocumentRenderer,
        input: &Path,
        out_dir: &Path,
        format: RenderFormat,
    ) -> Result<PathBuf> {
        let attempts = self.options.retries + 1;
        let mut attempt = 1;
        loop {
            let result = renderer.render(input, out_dir, format).and_then(|path| {
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(Error::Conversion {
                        file: input.display().to_string(),
                        reason: format!("{} produced no output file", renderer.name()),
                    })
                }
            });

            match result {
                Ok(path) => return Ok(path),
                Err(e) if e.is_transient() && attempt < attempts => {
                    log::warn!(
                        "Render attempt {}/{} failed, retrying: {}",
                        attempt,
                        attempts,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Private temporary directory with separate areas for sources and renders.
struct Workspace {
    dir: TempDir,
    sources: PathBuf,
    rendered: PathBuf,
}

impl Workspace {
    fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("certgen-").tempdir()?;
        let sources = dir.path().join("pptx");
        let rendered = dir.path().join("rendered");
        fs::create_dir(&sources)?;
        fs::create_dir(&rendered)?;
        log::debug!("Working directory {}", dir.path().display());
        Ok(Self {
            dir,
            sources,
            rendered,
        })
    }

    fn sources(&self) -> &Path {
        &self.sources
    }

    fn rendered(&self) -> &Path {
        &self.rendered
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        log::debug!("Removing working directory {}", self.dir.path().display());
    }
}

/// Decode a rendered page and flatten it to RGB.
fn load_image(path: &Path) -> Result<PdfImage> {
    let rgb = image::open(path)
        .map_err(|e| Error::Conversion {
            file: path.display().to_string(),
            reason: format!("unreadable render: {}", e),
        })?
        .to_rgb8();

    PdfImage::from_rgb(rgb.width(), rgb.height(), rgb.as_raw())
        .map_err(|e| Error::Packaging(format!("failed to embed {}: {}", path.display(), e)))
}
