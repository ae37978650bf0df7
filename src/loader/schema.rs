//! Resolve source headers to the canonical columns and coerce cells to numbers.

use tracing::warn;

use super::parse::RawTable;
use crate::error::{LookupError, Result};
use crate::models::{Column, SolarRow, Table};

/// Source column index for each canonical column, in `Column::POSITIONAL` order.
pub type ColumnMap = [usize; 6];

/// Header resolution, in order of preference:
///
/// 1. every canonical name present: map by name (first occurrence wins,
///    extra columns are ignored)
/// 2. exactly six columns under other names: assign
///    `TEMP, GHI, DNI, DIF, Latitude, Longitude` by position
/// 3. anything else is a schema error carrying both header lists
pub fn resolve_columns(headers: &[String]) -> Result<ColumnMap> {
    if let Some(map) = map_by_name(headers) {
        return Ok(map);
    }

    if headers.len() == Column::POSITIONAL.len() {
        warn!(
            "Header names {:?} do not match {:?}; assigning columns by position",
            headers,
            Column::canonical_names()
        );
        return Ok([0, 1, 2, 3, 4, 5]);
    }

    Err(LookupError::Schema {
        expected: Column::canonical_names(),
        actual: headers.to_vec(),
    })
}

fn map_by_name(headers: &[String]) -> Option<ColumnMap> {
    let mut map: [Option<usize>; 6] = [None; 6];
    for (idx, header) in headers.iter().enumerate() {
        if let Some(column) = Column::from_name(header) {
            let slot = Column::POSITIONAL.iter().position(|c| *c == column)?;
            map[slot].get_or_insert(idx);
        }
    }

    let mut resolved = [0usize; 6];
    for (slot, idx) in map.into_iter().enumerate() {
        resolved[slot] = idx?;
    }
    Some(resolved)
}

/// Numeric coercion: anything that does not parse to a finite number becomes 0.
pub fn coerce(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Build the canonical table. Every source row is kept; missing or
/// non-numeric cells become 0.
pub fn normalize(raw: &RawTable) -> Result<Table> {
    let map = resolve_columns(&raw.headers)?;

    let table = raw
        .rows
        .iter()
        .map(|cells| {
            let mut row = SolarRow::default();
            for (slot, column) in Column::POSITIONAL.iter().enumerate() {
                let value = cells.get(map[slot]).map_or(0.0, |c| coerce(c));
                row.set(*column, value);
            }
            row
        })
        .collect();

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_order_maps_identity() {
        let headers = strings(&["TEMP", "GHI", "DNI", "DIF", "Latitude", "Longitude"]);
        assert_eq!(resolve_columns(&headers).unwrap(), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_permuted_headers_normalize_identically() {
        let canonical = RawTable {
            headers: strings(&["TEMP", "GHI", "DNI", "DIF", "Latitude", "Longitude"]),
            rows: vec![strings(&["25", "500", "300", "100", "10", "20"])],
        };
        let permuted = RawTable {
            headers: strings(&["Longitude", "DIF", "Latitude", "TEMP", "DNI", "GHI"]),
            rows: vec![strings(&["20", "100", "10", "25", "300", "500"])],
        };
        assert_eq!(normalize(&canonical).unwrap(), normalize(&permuted).unwrap());
    }

    #[test]
    fn test_extra_columns_ignored_when_names_match() {
        let raw = RawTable {
            headers: strings(&["id", "Latitude", "Longitude", "TEMP", "GHI", "DNI", "DIF"]),
            rows: vec![strings(&["7", "1", "2", "3", "4", "5", "6"])],
        };
        let table = normalize(&raw).unwrap();
        let row = table.rows()[0];
        assert_eq!((row.latitude, row.longitude), (1.0, 2.0));
        assert_eq!((row.temp, row.dif), (3.0, 6.0));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let headers = strings(&["TEMP", "GHI", "DNI", "DIF", "Latitude", "Longitude", "TEMP"]);
        assert_eq!(resolve_columns(&headers).unwrap(), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_positional_fallback() {
        let raw = RawTable {
            headers: strings(&["t", "g", "dn", "df", "lat", "lon"]),
            rows: vec![strings(&["25", "500", "300", "100", "10", "20"])],
        };
        let row = normalize(&raw).unwrap().rows()[0];
        assert_eq!(row.temp, 25.0);
        assert_eq!(row.dif, 100.0);
        assert_eq!(row.latitude, 10.0);
        assert_eq!(row.longitude, 20.0);
    }

    #[test]
    fn test_schema_error_lists_both_sides() {
        let headers = strings(&["lat", "lon", "ghi"]);
        match resolve_columns(&headers).unwrap_err() {
            LookupError::Schema { expected, actual } => {
                assert_eq!(expected, Column::canonical_names());
                assert_eq!(actual, headers);
            }
            other => panic!("unexpected {:?}", other),
        }

        let message = LookupError::Schema {
            expected: Column::canonical_names(),
            actual: headers,
        }
        .to_string();
        assert!(message.contains("TEMP"));
        assert!(message.contains("ghi"));
    }

    #[test]
    fn test_non_numeric_cells_zeroed_and_row_kept() {
        let raw = RawTable {
            headers: strings(&["TEMP", "GHI", "DNI", "DIF", "Latitude", "Longitude"]),
            rows: vec![
                strings(&["", "abc", "300", "NaN", "10", "20"]),
                strings(&["30", "600"]),
            ],
        };
        let table = normalize(&raw).unwrap();
        assert_eq!(table.len(), 2);

        let first = table.rows()[0];
        assert_eq!(first.temp, 0.0);
        assert_eq!(first.ghi, 0.0);
        assert_eq!(first.dni, 300.0);
        assert_eq!(first.dif, 0.0);

        let short = table.rows()[1];
        assert_eq!(short.ghi, 600.0);
        assert_eq!(short.latitude, 0.0);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(" 12.5 "), 12.5);
        assert_eq!(coerce("-3"), -3.0);
        assert_eq!(coerce("1e3"), 1000.0);
        assert_eq!(coerce("inf"), 0.0);
        assert_eq!(coerce("12,5"), 0.0);
    }
}
