//! ZIP archive assembly.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// In-memory ZIP with unique entry names.
pub struct ArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
    options: SimpleFileOptions,
}

impl ArchiveBuilder {
    /// Create an empty archive using Deflate compression.
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Add one file. Entry names must be unique.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if !self.names.insert(name.to_string()) {
            return Err(Error::Packaging(format!("duplicate archive entry {}", name)));
        }
        self.zip
            .start_file(name, self.options)
            .map_err(|e| Error::Packaging(format!("failed to add {}: {}", name, e)))?;
        self.zip
            .write_all(data)
            .map_err(|e| Error::Packaging(format!("failed to write {}: {}", name, e)))?;
        Ok(())
    }

    /// Get the number of entries added so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no entries were added.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Finalize the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| Error::Packaging(format!("failed to finalize archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
