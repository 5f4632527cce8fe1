//! Image placement on output pages.

/// Rectangle an image is drawn into, in PDF points (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Drawn width
    pub width: f32,
    /// Drawn height
    pub height: f32,
}

/// Fit an image onto a page, preserving its aspect ratio.
///
/// An image wider than the page fills the full width and is centered
/// vertically; otherwise it fills the full height and is centered
/// horizontally.
pub fn letterbox(image_width: u32, image_height: u32, page_width: f32, page_height: f32) -> Placement {
    if image_width == 0 || image_height == 0 {
        return Placement {
            x: 0.0,
            y: 0.0,
            width: page_width,
            height: page_height,
        };
    }

    let image_aspect = image_width as f32 / image_height as f32;
    let page_aspect = page_width / page_height;

    if image_aspect > page_aspect {
        let height = page_width / image_aspect;
        Placement {
            x: 0.0,
            y: (page_height - height) / 2.0,
            width: page_width,
            height,
        }
    } else {
        let width = page_height * image_aspect;
        Placement {
            x: (page_width - width) / 2.0,
            y: 0.0,
            width,
            height: page_height,
        }
    }
}
