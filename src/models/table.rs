//! Canonical six-column irradiance table.

use serde::{Deserialize, Serialize};

use super::Irradiance;

/// One of the six canonical columns every row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Temp,
    Ghi,
    Dni,
    Dif,
    Latitude,
    Longitude,
}

impl Column {
    /// Order used when headers are assigned by position.
    pub const POSITIONAL: [Column; 6] = [
        Column::Temp,
        Column::Ghi,
        Column::Dni,
        Column::Dif,
        Column::Latitude,
        Column::Longitude,
    ];

    /// Header name as it appears in the source data
    pub fn name(self) -> &'static str {
        match self {
            Column::Temp => "TEMP",
            Column::Ghi => "GHI",
            Column::Dni => "DNI",
            Column::Dif => "DIF",
            Column::Latitude => "Latitude",
            Column::Longitude => "Longitude",
        }
    }

    /// Exact (case-sensitive) header match
    pub fn from_name(name: &str) -> Option<Self> {
        Self::POSITIONAL.into_iter().find(|c| c.name() == name)
    }

    pub fn canonical_names() -> Vec<String> {
        Self::POSITIONAL
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully numeric row. Unparseable source cells have already been zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SolarRow {
    #[serde(rename = "TEMP")]
    pub temp: f64,
    #[serde(rename = "GHI")]
    pub ghi: f64,
    #[serde(rename = "DNI")]
    pub dni: f64,
    #[serde(rename = "DIF")]
    pub dif: f64,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl SolarRow {
    pub fn set(&mut self, column: Column, value: f64) {
        match column {
            Column::Temp => self.temp = value,
            Column::Ghi => self.ghi = value,
            Column::Dni => self.dni = value,
            Column::Dif => self.dif = value,
            Column::Latitude => self.latitude = value,
            Column::Longitude => self.longitude = value,
        }
    }

    /// Squared planar distance in (lat, lon) degrees. Not geodesic.
    pub fn distance_sq(&self, lat: f64, lon: f64) -> f64 {
        let dlat = self.latitude - lat;
        let dlon = self.longitude - lon;
        dlat * dlat + dlon * dlon
    }

    /// Either coordinate exactly zero, which some sources use for "unset"
    pub fn has_zero_coordinate(&self) -> bool {
        self.latitude == 0.0 || self.longitude == 0.0
    }

    pub fn irradiance(&self) -> Irradiance {
        Irradiance {
            temp: self.temp,
            ghi: self.ghi,
            dni: self.dni,
            dif: self.dif,
        }
    }
}

/// Rows in source order. Built per lookup and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<SolarRow>,
}

impl Table {
    pub fn new(rows: Vec<SolarRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SolarRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SolarRow> {
        self.rows.iter()
    }
}

impl FromIterator<SolarRow> for Table {
    fn from_iter<I: IntoIterator<Item = SolarRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
