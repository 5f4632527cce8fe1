//! The single artifact an export produces.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Kind of deliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliverableKind {
    /// Multi-page PDF
    MergedPdf,
    /// ZIP archive
    Archive,
}

impl DeliverableKind {
    /// MIME type for transport.
    pub fn mime_type(self) -> &'static str {
        match self {
            DeliverableKind::MergedPdf => "application/pdf",
            DeliverableKind::Archive => "application/zip",
        }
    }
}

/// Finished output of a batch, held in memory.
#[derive(Debug, Clone)]
pub struct Deliverable {
    /// PDF or ZIP
    pub kind: DeliverableKind,

    /// Suggested file name
    pub file_name: String,

    /// File content
    pub bytes: Vec<u8>,

    /// Number of personalized units (pages or entries)
    pub units: usize,
}

impl Deliverable {
    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the deliverable has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type of the content.
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    /// Write to `path` atomically.
    ///
    /// Content goes to a temporary file in the same directory, which is then
    /// renamed over `path`.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(&self.bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| Error::Io(e.error))?;

        log::info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(())
    }
}
