//! Document model types for certificate templates.
//!
//! This module defines the structured view of a slide-deck template
//! (pages, text regions, paragraphs and styled runs), the recipients
//! read from an attendee list, and the per-recipient personalized copy.

mod document;
mod page;
mod paragraph;
mod recipient;

pub use document::{
    index_width, PageSize, PersonalizedDocument, SplitPlaceholder, Template, TemplateInfo,
    EMU_PER_INCH,
};
pub use page::{Page, TextRegion};
pub(crate) use paragraph::TextSpan;
pub use paragraph::{Paragraph, RunStyle, TextRun};
pub use recipient::Recipient;
