//! OOXML workbook (`.xlsx`) attendee lists.
//!
//! Only the first worksheet is read. Column A is located by cell
//! reference, or by position when a cell carries no reference.

use crate::error::{Error, Result};
use crate::pptx::xml::{self, pattern};
use crate::pptx::Package;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const FALLBACK_SHEET: &str = "xl/worksheets/sheet1.xml";

// SpreadsheetML elements may carry any namespace prefix, e.g. `<x:row>`.
pattern!(sheet_pattern, r"<(?:\w+:)?sheet\b([^>]*)/?>");
pattern!(relationship_pattern, r"<(?:\w+:)?Relationship\b([^>]*)/?>");
pattern!(
    shared_item_pattern,
    r"(?s)<(?:\w+:)?si>(.*?)</(?:\w+:)?si>|<(?:\w+:)?si/>"
);
pattern!(phonetic_pattern, r"(?s)<(?:\w+:)?rPh\b.*?</(?:\w+:)?rPh>");
pattern!(
    string_text_pattern,
    r"(?s)<(?:\w+:)?t(?:\s[^>]*[^/])?>(.*?)</(?:\w+:)?t>"
);
pattern!(
    row_pattern,
    r"(?s)<(?:\w+:)?row\b[^>]*?(?:/>|>(.*?)</(?:\w+:)?row>)"
);
pattern!(
    cell_pattern,
    r"(?s)<(?:\w+:)?c\b([^>]*?)(?:/>|>(.*?)</(?:\w+:)?c>)"
);
pattern!(value_pattern, r"(?s)<(?:\w+:)?v>(.*?)</(?:\w+:)?v>");

/// Last column Excel can address (`XFD`).
const MAX_COLUMN_LETTERS: usize = 3;

/// First-column cell of every non-empty row.
pub(super) fn first_column(data: &[u8], has_header: bool) -> Result<Vec<Option<String>>> {
    let package = Package::from_bytes(data)
        .map_err(|e| Error::Load(format!("not a readable .xlsx workbook: {}", e)))?;

    let sheet_part = first_sheet_part(&package)?;
    let sheet = package
        .part_text(&sheet_part)
        .ok_or_else(|| Error::Load(format!("worksheet {} is missing", sheet_part)))?;
    let shared = shared_strings(&package);

    let mut rows = Vec::new();
    for row in row_pattern().captures_iter(&sheet) {
        let Some(body) = row.get(1) else {
            continue;
        };
        let mut has_cells = false;
        let mut first = None;
        for (position, cell) in cell_pattern().captures_iter(body.as_str()).enumerate() {
            let attrs = &cell[1];
            let value = cell_value(attrs, cell.get(2).map_or("", |m| m.as_str()), &shared)?;
            if value.as_deref().is_some_and(|v| !v.is_empty()) {
                has_cells = true;
            }
            let column = match xml::attr(attrs, "r") {
                Some(reference) => column_index(&reference)?,
                None => position,
            };
            if column == 0 {
                first = value;
            }
        }
        if has_cells {
            rows.push(first);
        }
    }

    if has_header && !rows.is_empty() {
        rows.remove(0);
    }
    Ok(rows)
}

fn first_sheet_part(package: &Package) -> Result<String> {
    let workbook = package
        .part_text(WORKBOOK_PART)
        .ok_or_else(|| Error::Load("workbook part is missing".into()))?;

    let rel_id = sheet_pattern()
        .captures(&workbook)
        .and_then(|c| xml::attr_local(&c[1], "id"))
        .ok_or_else(|| Error::Load("workbook has no worksheets".into()))?;

    let target = package.part_text(WORKBOOK_RELS).and_then(|rels| {
        relationship_pattern()
            .captures_iter(&rels)
            .find(|c| xml::attr(&c[1], "Id").as_deref() == Some(rel_id.as_str()))
            .and_then(|c| xml::attr(&c[1], "Target"))
    });

    match target {
        Some(target) => Ok(xml::resolve_target("xl", &target)),
        None => {
            log::warn!("Worksheet relationship {} not found, using {}", rel_id, FALLBACK_SHEET);
            Ok(FALLBACK_SHEET.to_string())
        }
    }
}

fn shared_strings(package: &Package) -> Vec<String> {
    let Some(text) = package.part_text(SHARED_STRINGS_PART) else {
        return Vec::new();
    };
    shared_item_pattern()
        .captures_iter(&text)
        .map(|item| item.get(1).map_or(String::new(), |m| rich_text(m.as_str())))
        .collect()
}

/// Concatenate the `<t>` elements of a string item, skipping phonetic hints.
fn rich_text(item: &str) -> String {
    let item = phonetic_pattern().replace_all(item, "");
    string_text_pattern()
        .captures_iter(&item)
        .map(|c| xml::unescape(&c[1]).into_owned())
        .collect()
}

fn cell_value(attrs: &str, body: &str, shared: &[String]) -> Result<Option<String>> {
    let raw = value_pattern()
        .captures(body)
        .map(|c| xml::unescape(&c[1]).into_owned());

    let value = match xml::attr(attrs, "t").as_deref() {
        Some("s") => match raw {
            Some(index) => {
                let index: usize = index
                    .trim()
                    .parse()
                    .map_err(|_| Error::Load(format!("invalid shared string index {:?}", index)))?;
                let text = shared.get(index).ok_or_else(|| {
                    Error::Load(format!("shared string {} out of range", index))
                })?;
                Some(text.clone())
            }
            None => None,
        },
        Some("inlineStr") => Some(rich_text(body)),
        Some("b") => raw.map(|v| if v.trim() == "1" { "TRUE" } else { "FALSE" }.to_string()),
        Some("e") => None,
        _ => raw,
    };
    Ok(value)
}

/// Zero-based column index of a cell reference such as `A1` or `AB12`.
fn column_index(reference: &str) -> Result<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .collect();
    if letters.is_empty() || letters.len() > MAX_COLUMN_LETTERS {
        return Err(Error::Load(format!("invalid cell reference {:?}", reference)));
    }
    let column = letters.iter().fold(0usize, |acc, c| {
        acc * 26 + usize::from(c.to_ascii_uppercase() - b'A' + 1)
    });
    Ok(column - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1").unwrap(), 0);
        assert_eq!(column_index("b7").unwrap(), 1);
        assert_eq!(column_index("Z3").unwrap(), 25);
        assert_eq!(column_index("AA10").unwrap(), 26);
        assert_eq!(column_index("XFD1").unwrap(), 16_383);
    }

    #[test]
    fn test_bad_column_reference_is_load_error() {
        for reference in ["AAAAAAAAAAAAAAAAA1", "XFDA1", "12"] {
            let err = column_index(reference).unwrap_err();
            assert!(matches!(err, Error::Load(_)), "{}", reference);
        }
    }

    #[test]
    fn test_prefixed_markup() {
        let shared = rich_text("<x:r><x:t>Ana</x:t></x:r><x:rPh><x:t>a</x:t></x:rPh>");
        assert_eq!(shared, "Ana");
        assert_eq!(
            cell_value(" r='A1'", "<x:v>7</x:v>", &[]).unwrap().as_deref(),
            Some("7")
        );
    }

    #[test]
    fn test_rich_text_skips_phonetics() {
        let item = r#"<r><t>Ana </t></r><r><t xml:space="preserve">Lima</t></r><rPh sb="0" eb="1"><t>x</t></rPh>"#;
        assert_eq!(rich_text(item), "Ana Lima");
    }

    #[test]
    fn test_cell_values() {
        let shared = vec!["Ana".to_string()];
        assert_eq!(cell_value(r#" r="A1" t="s""#, "<v>0</v>", &shared).unwrap().as_deref(), Some("Ana"));
        assert_eq!(
            cell_value(r#" r="A2" t="inlineStr""#, "<is><t>Bo &amp; Cy</t></is>", &shared)
                .unwrap()
                .as_deref(),
            Some("Bo & Cy")
        );
        assert_eq!(cell_value(r#" r="A3""#, "<v>42</v>", &shared).unwrap().as_deref(), Some("42"));
        assert_eq!(cell_value(r#" r="A4" t="e""#, "<v>#N/A</v>", &shared).unwrap(), None);
        assert!(cell_value(r#" t="s""#, "<v>9</v>", &shared).is_err());
    }

    #[test]
    fn test_garbage_is_load_error() {
        let err = first_column(b"not a workbook", true).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }
}
