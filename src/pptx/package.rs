//! OOXML package (zip container) access.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Raw parts of an OOXML package, in their original archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

impl Package {
    /// Read every part of a zip package into memory.
    pub fn from_bytes(data: &[u8]) -> ZipResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push(Part {
                name: file.name().trim_start_matches('/').to_string(),
                data,
            });
        }
        Ok(Self { parts })
    }

    /// Get the raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Get a part as text, replacing invalid UTF-8 sequences.
    pub fn part_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.part(name).map(String::from_utf8_lossy)
    }

    /// Check if the package contains a part.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Names of all parts in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Get the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the package has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Write the package as a new zip, replacing the content of `overrides`.
    pub fn write_with(&self, overrides: &HashMap<String, String>) -> ZipResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            zip.start_file(part.name.as_str(), options)?;
            match overrides.get(&part.name) {
                Some(text) => zip.write_all(text.as_bytes())?,
                None => zip.write_all(&part.data)?,
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}
