//! Document writer: [`PersonalizedDocument`] back to a `.pptx` package.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{Page, PersonalizedDocument};

use super::package::Package;
use super::xml;

/// Serialize a personalized document to `.pptx` bytes.
///
/// Only the text bodies of changed runs are rewritten; run properties and
/// all other markup are carried over byte for byte.
pub fn write_document(doc: &PersonalizedDocument) -> Result<Vec<u8>> {
    let mut overrides = HashMap::new();
    for page in &doc.pages {
        if let Some(xml) = rewrite_page(&doc.package, page)? {
            overrides.insert(page.part_name.clone(), xml);
        }
    }

    doc.package
        .write_with(&overrides)
        .map_err(|e| {
            Error::Packaging(format!("failed to write presentation: {}", e))
                .for_recipient(doc.recipient.index, doc.recipient.name.clone())
        })
}

/// Rebuild one slide part, or `None` when no run changed.
fn rewrite_page(package: &Package, page: &Page) -> Result<Option<String>> {
    let source = package.part_text(&page.part_name).ok_or_else(|| {
        Error::Template(format!("missing slide part {}", page.part_name))
    })?;

    let mut edits: Vec<(std::ops::Range<usize>, Cow<'_, str>)> = Vec::new();
    for run in page.runs() {
        match &run.span {
            Some(span) if xml::unescape(&span.raw) != run.text => {
                edits.push((span.range.clone(), xml::escape(&run.text)));
            }
            Some(_) => {}
            None if !run.text.is_empty() => {
                log::warn!(
                    "Page {}: run without a text body cannot be written, dropping {:?}",
                    page.number,
                    run.text
                );
            }
            None => {}
        }
    }

    if edits.is_empty() {
        return Ok(None);
    }

    edits.sort_by_key(|(range, _)| range.start);
    let mut out = String::with_capacity(source.len() + 64);
    let mut cursor = 0;
    for (range, text) in edits {
        if range.start < cursor || range.end > source.len() {
            return Err(Error::Template(format!(
                "text span {:?} does not fit {}",
                range, page.part_name
            )));
        }
        out.push_str(&source[cursor..range.start]);
        out.push_str(&text);
        cursor = range.end;
    }
    out.push_str(&source[cursor..]);

    Ok(Some(out))
}
