//! Nearest-match over a loaded table.
//!
//! Distance is squared planar distance in degree space, which is adequate
//! for the small regions these datasets cover but is not geodesic. A full
//! scan per query; the table is rebuilt per lookup anyway.

use tracing::debug;

use crate::error::{LookupError, Result};
use crate::models::{Irradiance, SolarRow, Table};

/// Winning row with its position and squared distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestMatch<'a> {
    pub index: usize,
    pub row: &'a SolarRow,
    pub distance_sq: f64,
}

/// Stable argmin: on equal distances the earlier row wins.
pub fn nearest_row(table: &Table, lat: f64, lon: f64) -> Option<NearestMatch<'_>> {
    let mut best: Option<NearestMatch<'_>> = None;

    for (index, row) in table.iter().enumerate() {
        let distance_sq = row.distance_sq(lat, lon);
        if best.map_or(true, |b| distance_sq < b.distance_sq) {
            best = Some(NearestMatch {
                index,
                row,
                distance_sq,
            });
        }
    }

    best
}

/// Reject NaN and infinite coordinates; out-of-range finite values are fine.
pub fn validate_query(lat: f64, lon: f64) -> Result<()> {
    if lat.is_finite() && lon.is_finite() {
        Ok(())
    } else {
        Err(LookupError::InvalidQuery { lat, lon })
    }
}

/// Project `TEMP, GHI, DNI, DIF` from the row closest to `(lat, lon)`.
pub fn find_nearest(table: &Table, lat: f64, lon: f64) -> Result<Irradiance> {
    validate_query(lat, lon)?;
    let found = nearest_row(table, lat, lon).ok_or(LookupError::EmptyTable)?;
    debug!(
        "Nearest to ({}, {}) is row {} at ({}, {}), d²={}",
        lat, lon, found.index, found.row.latitude, found.row.longitude, found.distance_sq
    );
    Ok(found.row.irradiance())
}
