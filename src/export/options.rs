//! Export options and configuration.

use crate::model::PageSize;

/// Default name of the merged PDF deliverable.
pub const MERGED_FILE_NAME: &str = "All_Certificates.pdf";

/// Default name of the archive deliverables.
pub const ARCHIVE_FILE_NAME: &str = "Certificates.zip";

/// Shape of the deliverable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportMode {
    /// One PDF, one page per recipient
    #[default]
    Merged,

    /// ZIP of editable `.pptx` documents
    Archive,

    /// ZIP of per-recipient PDFs
    RenderedArchive,
}

impl ExportMode {
    /// Whether this mode needs an external renderer.
    pub fn needs_renderer(self) -> bool {
        !matches!(self, ExportMode::Archive)
    }

    /// File name used when none is configured.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportMode::Merged => MERGED_FILE_NAME,
            ExportMode::Archive | ExportMode::RenderedArchive => ARCHIVE_FILE_NAME,
        }
    }
}

/// Options for building a deliverable.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Deliverable shape
    pub mode: ExportMode,

    /// Output page size for merged PDFs; the template size when unset
    pub page_size: Option<PageSize>,

    /// Extra attempts after a transient renderer failure
    pub retries: u32,

    /// Deliverable file name; the mode default when unset
    pub file_name: Option<String>,

    /// Prefix of per-recipient file names
    pub entry_stem: String,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the export mode.
    pub fn with_mode(mut self, mode: ExportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Override the merged PDF page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set how many times a failed render is retried.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the deliverable file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Set the prefix of per-recipient file names.
    pub fn with_entry_stem(mut self, stem: impl Into<String>) -> Self {
        self.entry_stem = stem.into();
        self
    }

    /// Resolved deliverable file name.
    pub fn file_name(&self) -> &str {
        self.file_name
            .as_deref()
            .unwrap_or_else(|| self.mode.default_file_name())
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            mode: ExportMode::default(),
            page_size: None,
            retries: 1,
            file_name: None,
            entry_stem: "cert".to_string(),
        }
    }
}
