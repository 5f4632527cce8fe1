//! Delimited text (CSV/TSV) attendee lists.

use crate::error::{Error, Result};

/// First field of every record, `None` for records without one.
pub(super) fn first_column(data: &[u8], delimiter: u8, has_header: bool) -> Result<Vec<Option<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let mut cells = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|e| match e.kind() {
            csv::ErrorKind::Utf8 { .. } => {
                Error::Load(format!("record {} is not valid UTF-8", i + 1))
            }
            _ => Error::from(e),
        })?;
        cells.push(record.get(0).map(str::to_string));
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_ragged_and_quoted() {
        let data = b"\"Smith, John\",x,y\nBo\n\n\"\"\n";
        let cells = first_column(data, b',', false).unwrap();
        assert_eq!(
            cells,
            vec![Some("Smith, John".to_string()), Some("Bo".to_string()), Some(String::new())]
        );
    }

    #[test]
    fn test_first_column_tab_delimited_with_header() {
        let data = b"Name\tEmail\nAna\tana@example.com\n";
        let cells = first_column(data, b'\t', true).unwrap();
        assert_eq!(cells, vec![Some("Ana".to_string())]);
    }

    #[test]
    fn test_invalid_utf8_is_load_error() {
        let data = b"Ana\n\xff\xfe\n";
        let err = first_column(data, b',', false).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }
}
