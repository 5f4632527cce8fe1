//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use certgen::convert::{expected_output, RenderFormat};
use certgen::Result;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const NAME_RUN_PROPS: &str = r#"<a:rPr lang="en-US" sz="4000" b="1" dirty="0"><a:solidFill><a:srgbClr val="1F3864"/></a:solidFill><a:latin typeface="Georgia"/></a:rPr>"#;

/// Slide with the name in a styled run, the date in a plain one, and a
/// static caption.
pub fn certificate_slide() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
            r#"<p:cSld><p:spTree>"#,
            r#"<p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US" sz="2000"/><a:t>Certificate of Attendance</a:t></a:r></a:p></p:txBody></p:sp>"#,
            r#"<p:sp><p:txBody><a:bodyPr/><a:p><a:r>{}<a:t>[NAME]</a:t></a:r></a:p></p:txBody></p:sp>"#,
            r#"<p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US" i="1"/><a:t>Held on [DATE]</a:t></a:r></a:p></p:txBody></p:sp>"#,
            r#"</p:spTree></p:cSld></p:sld>"#
        ),
        NAME_RUN_PROPS
    )
}

/// Slide whose `[NAME]` token is split over two runs.
pub fn split_slide() -> String {
    concat!(
        r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
        r#"<p:cSld><p:spTree><p:sp><p:txBody><a:p>"#,
        r#"<a:r><a:rPr b="1"/><a:t>[NA</a:t></a:r><a:r><a:rPr b="0"/><a:t>ME]</a:t></a:r>"#,
        r#"</a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
    )
    .to_string()
}

/// Build a `.pptx` with the given slide bodies and slide size in EMU.
pub fn build_pptx(slides: &[String], size: Option<(u64, u64)>) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    for i in 1..=slides.len() {
        content_types.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            i
        ));
    }
    content_types.push_str("</Types>");
    add(&mut zip, "[Content_Types].xml", &content_types, options);

    add(
        &mut zip,
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#,
        options,
    );

    let mut ids = String::new();
    let mut rels = String::new();
    for i in 1..=slides.len() {
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i + 1));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i + 1,
            i
        ));
    }
    let size_xml = size
        .map(|(cx, cy)| format!(r#"<p:sldSz cx="{}" cy="{}"/>"#, cx, cy))
        .unwrap_or_default();
    add(
        &mut zip,
        "ppt/presentation.xml",
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst>{}</p:sldIdLst>{}</p:presentation>"#,
            ids, size_xml
        ),
        options,
    );
    add(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        ),
        options,
    );

    for (i, slide) in slides.iter().enumerate() {
        add(&mut zip, &format!("ppt/slides/slide{}.xml", i + 1), slide, options);
    }

    zip.finish().unwrap().into_inner()
}

/// Standard 4:3 certificate template.
pub fn certificate_pptx() -> Vec<u8> {
    build_pptx(&[certificate_slide()], Some((9_144_000, 6_858_000)))
}

/// Workbook part naming a single sheet through relationship `rId1`.
pub const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Attendees" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

/// Minimal `.xlsx` with the given column A values (inline strings).
pub fn build_xlsx(rows: &[&str]) -> Vec<u8> {
    let mut sheet_rows = String::new();
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        sheet_rows.push_str(&format!(
            r#"<row r="{row}"><c r="A{row}" t="inlineStr"><is><t>{value}</t></is></c></row>"#,
            row = row,
            value = value
        ));
    }
    build_workbook(
        WORKBOOK_XML,
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            sheet_rows
        ),
        None,
    )
}

/// Workbook whose SpreadsheetML elements all carry an `x:` prefix, with
/// single-quoted attributes and names stored as shared strings.
pub fn build_prefixed_xlsx(rows: &[&str]) -> Vec<u8> {
    let mut sheet_rows = String::new();
    let mut shared = String::new();
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        sheet_rows.push_str(&format!(
            "<x:row r='{row}'><x:c r='A{row}' t='s'><x:v>{index}</x:v></x:c></x:row>",
            row = row,
            index = i
        ));
        shared.push_str(&format!("<x:si><x:t>{}</x:t></x:si>", value));
    }
    build_workbook(
        r#"<?xml version="1.0" encoding="utf-8"?><x:workbook xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><x:sheets><x:sheet name='Attendees' sheetId='1' rel:id='rId1'/></x:sheets></x:workbook>"#,
        &format!(
            r#"<?xml version="1.0" encoding="utf-8"?><x:worksheet xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><x:sheetData>{}</x:sheetData></x:worksheet>"#,
            sheet_rows
        ),
        Some(&format!(
            r#"<?xml version="1.0" encoding="utf-8"?><x:sst xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{n}" uniqueCount="{n}">{items}</x:sst>"#,
            n = rows.len(),
            items = shared
        )),
    )
}

/// Single-sheet workbook with the given worksheet and shared-strings parts.
pub fn build_workbook(workbook: &str, sheet: &str, shared_strings: Option<&str>) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    add(&mut zip, "xl/workbook.xml", workbook, options);
    add(
        &mut zip,
        "xl/_rels/workbook.xml.rels",
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        options,
    );
    add(&mut zip, "xl/worksheets/sheet1.xml", sheet, options);
    if let Some(shared) = shared_strings {
        add(&mut zip, "xl/sharedStrings.xml", shared, options);
    }

    zip.finish().unwrap().into_inner()
}

fn add(zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, content: &str, options: SimpleFileOptions) {
    zip.start_file(name, options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
}

/// Write a solid RGB PNG of the given size to `path`.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([250, 245, 230]));
    img.save(path).unwrap();
}

/// Renderer double: writes a 16:9 PNG (or a tiny PDF) where soffice
/// would put its output.
pub fn fake_render(input: &Path, out_dir: &Path, format: RenderFormat) -> Result<PathBuf> {
    let out = expected_output(input, out_dir, format);
    match format {
        RenderFormat::Png => write_png(&out, 160, 90),
        RenderFormat::Pdf => std::fs::write(&out, b"%PDF-1.4\n%%EOF\n")?,
    }
    Ok(out)
}
