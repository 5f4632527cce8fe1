//! Image-per-page PDF documents built on the lopdf object model.
//!
//! Each page carries one Flate-compressed RGB image XObject drawn into a
//! [`Placement`]. No fonts or text are emitted.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::layout::Placement;
use crate::error::Result;

const PDF_VERSION: &str = "1.5";
const IMAGE_NAME: &str = "Im0";

/// An RGB raster ready to embed, already zlib-compressed.
#[derive(Debug, Clone)]
pub struct PdfImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PdfImage {
    /// Compress 8-bit RGB pixel data (`width * height * 3` bytes).
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> io::Result<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("expected {} bytes of RGB data, got {}", expected, rgb.len()),
            ));
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(rgb)?;
        Ok(Self {
            width,
            height,
            data: encoder.finish()?,
        })
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn into_stream(self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(self.width)),
            "Height" => Object::Integer(i64::from(self.height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "FlateDecode",
        };
        Stream::new(dict, self.data).with_compression(false)
    }
}

/// Builds a PDF with a fixed page size and one image per page.
#[derive(Debug)]
pub struct PdfWriter {
    page_width: f32,
    page_height: f32,
    title: String,
    created: DateTime<Utc>,
    pages: Vec<(PdfImage, Placement)>,
}

impl PdfWriter {
    /// Create a writer for pages of the given size in points.
    pub fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            title: String::new(),
            created: Utc::now(),
            pages: Vec::new(),
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Append a page showing `image` inside `placement`.
    pub fn add_image_page(&mut self, image: PdfImage, placement: Placement) {
        self.pages.push((image, placement));
    }

    /// Get the number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for (image, placement) in self.pages {
            let page_id = add_page(
                &mut doc,
                pages_id,
                image,
                placement,
                (self.page_width, self.page_height),
            )?;
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.title),
            "Producer" => Object::string_literal("certgen"),
            "CreationDate" => Object::string_literal(format!("D:{}Z", self.created.format("%Y%m%d%H%M%S"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    image: PdfImage,
    placement: Placement,
    (page_width, page_height): (f32, f32),
) -> Result<ObjectId> {
    let image_id = doc.add_object(image.into_stream());

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    placement.width.into(),
                    Object::Integer(0),
                    Object::Integer(0),
                    placement.height.into(),
                    placement.x.into(),
                    placement.y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), page_width.into(), page_height.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
        "Contents" => content_id,
    }))
}

/// Count the pages of a PDF by walking its page tree.
pub fn count_pages(pdf: &[u8]) -> Result<usize> {
    Ok(Document::load_mem(pdf)?.get_pages().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            x: 0.0,
            y: 67.5,
            width: 720.0,
            height: 405.0,
        }
    }

    fn numbers(obj: &Object) -> Vec<f32> {
        obj.as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect()
    }

    #[test]
    fn test_image_size_is_checked() {
        assert!(PdfImage::from_rgb(2, 2, &[0; 12]).is_ok());
        assert!(PdfImage::from_rgb(2, 2, &[0; 11]).is_err());
    }

    #[test]
    fn test_two_page_document() {
        let mut writer = PdfWriter::new(720.0, 540.0).with_title("All Certificates");
        for _ in 0..2 {
            let image = PdfImage::from_rgb(4, 3, &[255; 36]).unwrap();
            writer.add_image_page(image, placement());
        }
        assert_eq!(writer.page_count(), 2);

        let bytes = writer.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(count_pages(&bytes).unwrap(), 2);

        let doc = Document::load_mem(&bytes).unwrap();
        for page_id in doc.get_pages().values() {
            let page = doc.get_dictionary(*page_id).unwrap();
            assert_eq!(numbers(page.get(b"MediaBox").unwrap()), [0.0, 0.0, 720.0, 540.0]);

            let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
            let cm = content
                .operations
                .iter()
                .find(|op| op.operator == "cm")
                .unwrap();
            let operands: Vec<f32> = cm.operands.iter().map(|o| o.as_float().unwrap()).collect();
            assert_eq!(operands, [720.0, 0.0, 0.0, 405.0, 0.0, 67.5]);
        }
    }

    #[test]
    fn test_pages_keep_insertion_order() {
        let mut writer = PdfWriter::new(100.0, 100.0);
        for width in 1..=3u32 {
            let image = PdfImage::from_rgb(width, 1, &vec![0; width as usize * 3]).unwrap();
            writer.add_image_page(image, placement());
        }
        let bytes = writer.finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let widths: Vec<i64> = doc
            .get_pages()
            .values()
            .map(|page_id| {
                let page = doc.get_dictionary(*page_id).unwrap();
                let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
                let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
                let image_id = xobjects.get(IMAGE_NAME.as_bytes()).unwrap().as_reference().unwrap();
                let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();
                stream.dict.get(b"Width").unwrap().as_i64().unwrap()
            })
            .collect();
        assert_eq!(widths, [1, 2, 3]);
    }

    #[test]
    fn test_empty_document_has_no_pages() {
        let bytes = PdfWriter::new(100.0, 100.0).finish().unwrap();
        assert_eq!(count_pages(&bytes).unwrap(), 0);
    }

    #[test]
    fn test_garbage_is_not_counted() {
        assert!(count_pages(b"/Type /Page /Parent 2 0 R").is_err());
    }
}
