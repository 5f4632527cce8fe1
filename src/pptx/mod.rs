//! PowerPoint (`.pptx`) template reading and writing.

mod package;
mod reader;
mod writer;
pub mod xml;

pub use package::Package;
pub use reader::{parse_slide, read_template};
pub use writer::write_document;
