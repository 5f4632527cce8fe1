//! # certgen
//!
//! Batch certificate generation from a slide-deck template.
//!
//! A `.pptx` template carries the placeholders `[NAME]` and `[DATE]`. For
//! every name in an attendee list the placeholders are substituted, keeping
//! each run's formatting, and the results are packaged as one deliverable:
//! a merged PDF or a ZIP archive.
//!
//! ## Quick Start
//!
//! ```no_run
//! use certgen::{Certgen, ExportMode};
//!
//! fn main() -> certgen::Result<()> {
//!     let deliverable = Certgen::new()
//!         .with_mode(ExportMode::Archive)
//!         .generate_files("attendees.xlsx", "template.pptx", "June 3, 2025")?;
//!
//!     deliverable.persist(&deliverable.file_name)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Attendee lists**: `.xlsx`, `.csv`, `.tsv` and `.txt`
//! - **Formatting preservation**: only run text is rewritten
//! - **Merged PDF**: one letterboxed page per recipient, rendered externally
//! - **Archives**: editable `.pptx` or rendered `.pdf` per recipient
//! - **Parallel personalization**: uses Rayon when enabled

pub mod attendees;
pub mod batch;
pub mod convert;
pub mod error;
pub mod export;
pub mod model;
pub mod personalize;
pub mod pptx;

// Re-export commonly used types
pub use attendees::{load_file, load_names, AttendeeKind, LoadOptions};
pub use batch::{personalize_all, write_all, BatchOptions};
pub use convert::{DocumentRenderer, RenderFormat, SofficeRenderer};
pub use error::{Error, Result, Stage};
pub use export::{Deliverable, DeliverableKind, ExportMode, ExportOptions, Exporter};
pub use model::{
    Page, PageSize, Paragraph, PersonalizedDocument, Recipient, RunStyle, Template, TemplateInfo,
    TextRegion, TextRun,
};
pub use personalize::{personalize, substitute, DATE_TOKEN, NAME_TOKEN};

use std::path::Path;
use std::sync::Arc;

/// Load recipients from an attendee file with default options.
///
/// # Example
///
/// ```no_run
/// let recipients = certgen::load_attendees("attendees.csv")?;
/// println!("{} names", recipients.len());
/// # Ok::<(), certgen::Error>(())
/// ```
pub fn load_attendees<P: AsRef<Path>>(path: P) -> Result<Vec<Recipient>> {
    attendees::load_file(path, &LoadOptions::default())
}

/// Read a template from a `.pptx` file.
pub fn open_template<P: AsRef<Path>>(path: P) -> Result<Template> {
    Template::open(path)
}

/// Builder for the whole generation pipeline.
///
/// # Example
///
/// ```no_run
/// use certgen::{Certgen, ExportMode, SofficeRenderer};
/// use std::sync::Arc;
///
/// let recipients = certgen::load_attendees("attendees.xlsx")?;
/// let template = certgen::open_template("template.pptx")?;
///
/// let deliverable = Certgen::new()
///     .with_mode(ExportMode::Merged)
///     .with_renderer(Arc::new(SofficeRenderer::locate()?))
///     .parallel(true)
///     .generate(&recipients, &template, "June 3, 2025")?;
/// deliverable.persist("All_Certificates.pdf")?;
/// # Ok::<(), certgen::Error>(())
/// ```
pub struct Certgen {
    load_options: LoadOptions,
    batch_options: BatchOptions,
    export_options: ExportOptions,
    renderer: Option<Arc<dyn DocumentRenderer>>,
}

impl Certgen {
    /// Create a new Certgen builder.
    pub fn new() -> Self {
        Self {
            load_options: LoadOptions::default(),
            batch_options: BatchOptions::default(),
            export_options: ExportOptions::default(),
            renderer: None,
        }
    }

    /// Set the deliverable shape.
    pub fn with_mode(mut self, mode: ExportMode) -> Self {
        self.export_options = self.export_options.with_mode(mode);
        self
    }

    /// Set the external renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Enable or disable parallel personalization.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.batch_options = self.batch_options.with_parallel(parallel);
        self
    }

    /// Force or suppress header-row handling for attendee files.
    pub fn with_header(mut self, has_header: Option<bool>) -> Self {
        self.load_options = self.load_options.with_header(has_header);
        self
    }

    /// Set how many times a failed render is retried.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.export_options = self.export_options.with_retries(retries);
        self
    }

    /// Override the merged PDF page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.export_options = self.export_options.with_page_size(size);
        self
    }

    /// Set the deliverable file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_options = self.export_options.with_file_name(name);
        self
    }

    /// Set the prefix of per-recipient file names.
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        let stem = stem.into();
        self.batch_options = self.batch_options.with_file_stem(stem.clone());
        self.export_options = self.export_options.with_entry_stem(stem);
        self
    }

    /// Personalize `template` for `recipients` and package the result.
    pub fn generate(
        &self,
        recipients: &[Recipient],
        template: &Template,
        event_date: &str,
    ) -> Result<Deliverable> {
        let docs = personalize_all(template, recipients, event_date, &self.batch_options)?;
        self.exporter().export(&docs)
    }

    /// Load both inputs from disk, then [`generate`](Self::generate).
    ///
    /// The event date is validated before any file is read.
    pub fn generate_files<P, Q>(
        &self,
        attendees_path: P,
        template_path: Q,
        event_date: &str,
    ) -> Result<Deliverable>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        if event_date.trim().is_empty() {
            return Err(Error::InvalidInput("event date must not be empty".into()));
        }
        let recipients = attendees::load_file(attendees_path, &self.load_options)?;
        let template = Template::open(template_path)?;
        self.generate(&recipients, &template, event_date)
    }

    fn exporter(&self) -> Exporter {
        let exporter = Exporter::new(self.export_options.clone());
        match &self.renderer {
            Some(renderer) => exporter.with_renderer(Arc::clone(renderer)),
            None => exporter,
        }
    }
}

impl Default for Certgen {
    fn default() -> Self {
        Self::new()
    }
}
