//! Batch personalization over an attendee list.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{index_width, PersonalizedDocument, Recipient, Template};
use crate::personalize::personalize;

/// Options for a personalization batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Personalize recipients on the rayon thread pool
    pub parallel: bool,

    /// Prefix of written file names
    pub file_stem: String,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the file name prefix.
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            file_stem: "cert".to_string(),
        }
    }
}

/// Personalize `template` once per recipient, preserving input order.
pub fn personalize_all(
    template: &Template,
    recipients: &[Recipient],
    event_date: &str,
    options: &BatchOptions,
) -> Result<Vec<PersonalizedDocument>> {
    if event_date.trim().is_empty() {
        return Err(Error::InvalidInput("event date must not be empty".into()));
    }
    if recipients.is_empty() {
        return Err(Error::Load("attendee list contains no names".into()));
    }

    for (page, text) in template.split_placeholders() {
        log::warn!(
            "Page {}: placeholder split across runs will not be replaced: {:?}",
            page,
            text
        );
    }

    log::info!(
        "Personalizing {} certificates ({})",
        recipients.len(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    let personalize_one = |recipient: &Recipient| {
        log::debug!("Personalizing #{} {}", recipient.index, recipient.name);
        personalize(template, recipient, event_date)
    };

    let docs: Vec<PersonalizedDocument> = if options.parallel {
        recipients.par_iter().map(personalize_one).collect()
    } else {
        recipients.iter().map(personalize_one).collect()
    };

    Ok(docs)
}

/// Write each document to `dir` as `<stem>_<index>_<slug>.pptx`.
///
/// Returns the written paths in document order.
pub fn write_all(docs: &[PersonalizedDocument], dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let width = index_width(docs.len());
    docs.iter()
        .map(|doc| {
            doc.save(dir, stem, width)
                .map_err(|e| e.for_recipient(doc.recipient.index, &doc.recipient.name))
        })
        .collect()
}
