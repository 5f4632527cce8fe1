//! Template reader: `.pptx` package to [`Template`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Page, PageSize, Paragraph, RunStyle, Template, TextRegion, TextRun, TextSpan};

use super::package::Package;
use super::xml::{self, pattern};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

pattern!(slide_size_pattern, r"<p:sldSz\b([^>]*)/?>");
pattern!(slide_id_pattern, r"<p:sldId\b([^>]*)/?>");
pattern!(relationship_pattern, r"<Relationship\b([^>]*)/?>");
pattern!(text_body_pattern, r"(?s)<(?:p|a):txBody\b[^>]*>.*?</(?:p|a):txBody>");
pattern!(paragraph_pattern, r"(?s)<a:p(?:\s[^>]*[^/])?>.*?</a:p>");
pattern!(run_pattern, r"(?s)<a:r(?:\s[^>]*[^/])?>.*?</a:r>");
pattern!(run_properties_pattern, r"(?s)<a:rPr\b([^>]*?)(?:/>|>(.*?)</a:rPr>)");
pattern!(text_pattern, r"(?s)<a:t(?:\s[^>]*[^/])?>(.*?)</a:t>");
pattern!(latin_font_pattern, r"<a:latin\b([^>]*)/?>");
pattern!(solid_color_pattern, r"(?s)<a:solidFill>\s*<a:srgbClr\b([^>]*)/?>");

/// Read a template from `.pptx` bytes.
pub fn read_template(data: &[u8]) -> Result<Template> {
    let package = Package::from_bytes(data)
        .map_err(|e| Error::Template(format!("not a readable .pptx package: {}", e)))?;

    let presentation = package
        .part_text(PRESENTATION_PART)
        .ok_or_else(|| Error::Template(format!("missing {}", PRESENTATION_PART)))?;

    let page_size = read_page_size(&presentation).unwrap_or_else(|| {
        log::warn!("Template has no slide size; assuming 10 x 7.5 inches");
        PageSize::standard()
    });

    let mut pages = Vec::new();
    for (i, part_name) in slide_parts(&package, &presentation)?.into_iter().enumerate() {
        let slide = package
            .part_text(&part_name)
            .ok_or_else(|| Error::Template(format!("missing slide part {}", part_name)))?;
        pages.push(parse_slide(&slide, i as u32 + 1, &part_name));
    }

    if pages.is_empty() {
        return Err(Error::Template("presentation contains no slides".into()));
    }

    log::debug!(
        "Read template: {} slide(s), {:.1} x {:.1} pt",
        pages.len(),
        page_size.width_pt(),
        page_size.height_pt()
    );

    Ok(Template {
        page_size,
        pages,
        package: Arc::new(package),
    })
}

fn read_page_size(presentation: &str) -> Option<PageSize> {
    let caps = slide_size_pattern().captures(presentation)?;
    let cx = xml::attr(&caps[1], "cx")?.parse().ok()?;
    let cy = xml::attr(&caps[1], "cy")?.parse().ok()?;
    if cx == 0 || cy == 0 {
        return None;
    }
    Some(PageSize::from_emu(cx, cy))
}

/// Slide part names in presentation order.
fn slide_parts(package: &Package, presentation: &str) -> Result<Vec<String>> {
    let rels = package
        .part_text(PRESENTATION_RELS)
        .ok_or_else(|| Error::Template(format!("missing {}", PRESENTATION_RELS)))?;

    let targets: HashMap<String, String> = relationship_pattern()
        .captures_iter(&rels)
        .filter_map(|c| Some((xml::attr(&c[1], "Id")?, xml::attr(&c[1], "Target")?)))
        .collect();

    slide_id_pattern()
        .captures_iter(presentation)
        .map(|c| -> Result<String> {
            let rel_id = xml::attr_local(&c[1], "id")
                .ok_or_else(|| Error::Template("slide entry without relationship id".into()))?;
            let target = targets.get(&rel_id).ok_or_else(|| {
                Error::Template(format!("slide relationship {} not found", rel_id))
            })?;
            Ok(xml::resolve_target("ppt", target))
        })
        .collect()
}

/// Parse the text structure of one slide part.
///
/// Every `txBody` (shape text frames and table cells) becomes a region.
pub fn parse_slide(xml: &str, number: u32, part_name: &str) -> Page {
    let mut page = Page::new(number, part_name);

    for body in text_body_pattern().find_iter(xml) {
        let mut region = TextRegion::new();
        for para in paragraph_pattern().find_iter(body.as_str()) {
            let para_start = body.start() + para.start();
            let mut paragraph = Paragraph::new();
            for run in run_pattern().find_iter(para.as_str()) {
                paragraph.add_run(parse_run(run.as_str(), para_start + run.start()));
            }
            region.paragraphs.push(paragraph);
        }
        page.add_region(region);
    }

    page
}

fn parse_run(run_xml: &str, offset: usize) -> TextRun {
    let style = run_properties_pattern()
        .captures(run_xml)
        .map(|c| parse_style(&c[1], c.get(2).map_or("", |m| m.as_str())))
        .unwrap_or_default();

    match text_pattern().captures(run_xml) {
        Some(caps) => {
            let body = caps.get(1).map_or(0..0, |m| m.range());
            let raw = &run_xml[body.clone()];
            TextRun {
                text: xml::unescape(raw).into_owned(),
                style,
                span: Some(TextSpan {
                    range: offset + body.start..offset + body.end,
                    raw: raw.to_string(),
                }),
            }
        }
        // `<a:t/>` or a run without text
        None => TextRun::styled("", style),
    }
}

fn parse_style(attrs: &str, children: &str) -> RunStyle {
    RunStyle {
        font_name: latin_font_pattern()
            .captures(children)
            .and_then(|c| xml::attr(&c[1], "typeface"))
            .filter(|t| !t.is_empty()),
        size: xml::attr(attrs, "sz")
            .and_then(|v| v.parse::<f32>().ok())
            .map(|hundredths| hundredths / 100.0),
        bold: xml::attr(attrs, "b").and_then(|v| parse_bool(&v)),
        italic: xml::attr(attrs, "i").and_then(|v| parse_bool(&v)),
        color: solid_color_pattern()
            .captures(children)
            .and_then(|c| xml::attr(&c[1], "val"))
            .map(|v| v.to_ascii_uppercase()),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}
