//! Turn raw source content into a string grid with a header row.

use csv::{ByteRecord, ReaderBuilder, Trim};

use crate::error::{LookupError, Result};
use crate::source::RawData;

/// Header names plus string cells, before any schema resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Parse either representation into a [`RawTable`].
///
/// `headers` replaces the header row for delimited text; when set, every
/// line of the body is data. Structured records already name their fields
/// and ignore it.
pub fn parse_raw(raw: RawData, delimiter: u8, headers: Option<&[String]>) -> Result<RawTable> {
    match raw {
        RawData::Delimited(bytes) => parse_delimited(&bytes, delimiter, headers),
        RawData::Records { headers, rows } => Ok(RawTable {
            headers: headers.into_iter().map(clean_header).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(cell_to_string).collect())
                .collect(),
        }),
    }
}

fn parse_delimited(bytes: &[u8], delimiter: u8, headers: Option<&[String]>) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(bytes);

    // Byte records so a cell with invalid UTF-8 degrades to a bad value
    // instead of failing the whole load
    let mut records = reader.byte_records();

    let headers = match headers {
        Some(given) => given.iter().cloned().map(clean_header).collect(),
        None => match records.next() {
            Some(first) => lossy_cells(&first.map_err(|e| LookupError::Parse(e.to_string()))?)
                .into_iter()
                .map(clean_header)
                .collect(),
            None => Vec::new(),
        },
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| LookupError::Parse(e.to_string()))?;
        rows.push(lossy_cells(&record));
    }

    Ok(RawTable { headers, rows })
}

fn lossy_cells(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).trim().to_string())
        .collect()
}

/// Strip a UTF-8 byte-order mark and surrounding whitespace
fn clean_header(header: String) -> String {
    header.trim_start_matches('\u{feff}').trim().to_string()
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => String::from(if b { "1" } else { "0" }),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delimited_header_row() {
        let body = b"TEMP,GHI,DNI,DIF,Latitude,Longitude\n25,500,300,100,10,20\n".to_vec();
        let table = parse_raw(RawData::Delimited(body), b',', None).unwrap();
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.headers[4], "Latitude");
        assert_eq!(table.rows, vec![vec!["25", "500", "300", "100", "10", "20"]]);
    }

    #[test]
    fn test_delimited_out_of_band_headers() {
        let body = b"25,500,300,100,10,20\n30,600,400,150,50,60\n".to_vec();
        let headers: Vec<String> = ["TEMP", "GHI", "DNI", "DIF", "Latitude", "Longitude"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let table = parse_raw(RawData::Delimited(body), b',', Some(&headers)).unwrap();
        assert_eq!(table.headers, headers);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_delimited_ragged_and_bom() {
        let body = "\u{feff}TEMP , GHI\n25\n1,2,3\n".as_bytes().to_vec();
        let table = parse_raw(RawData::Delimited(body), b',', None).unwrap();
        assert_eq!(table.headers, vec!["TEMP", "GHI"]);
        assert_eq!(table.rows[0], vec!["25"]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_invalid_utf8_cell_degrades() {
        let mut body = b"TEMP,GHI,DNI,DIF,Latitude,Longitude\n".to_vec();
        body.extend_from_slice(b"\xff\xfe,500,300,100,10,20\n");
        body.extend_from_slice(b"30,600,400,150,50,60\n");

        let table = parse_raw(RawData::Delimited(body), b',', None).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "500");
        assert_eq!(crate::loader::coerce(&table.rows[0][0]), 0.0);
    }

    #[test]
    fn test_delimited_empty_body() {
        let table = parse_raw(RawData::Delimited(Vec::new()), b',', None).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let body = b"TEMP;GHI\n1,5;2\n".to_vec();
        let table = parse_raw(RawData::Delimited(body), b';', None).unwrap();
        assert_eq!(table.rows[0], vec!["1,5", "2"]);
    }

    #[test]
    fn test_records_cells_stringified() {
        let raw = RawData::Records {
            headers: vec!["TEMP".into(), " GHI ".into()],
            rows: vec![vec![json!(25.5), json!(null)], vec![json!("n/a"), json!(true)]],
        };
        let table = parse_raw(raw, b',', None).unwrap();
        assert_eq!(table.headers, vec!["TEMP", "GHI"]);
        assert_eq!(table.rows[0], vec!["25.5", ""]);
        assert_eq!(table.rows[1], vec!["n/a", "1"]);
    }
}
