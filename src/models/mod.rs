//! Core data models for the irradiance lookup.

pub mod result;
pub mod table;

pub use result::{Irradiance, LookupResult};
pub use table::{Column, SolarRow, Table};
