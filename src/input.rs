//! JSON loaders for the pulse and geometry tables
//!
//! Both tables are flat JSON arrays of fixed-field objects. Malformed rows
//! (missing fields, wrong types) fail the whole load with the row position
//! reported by serde_json.

use crate::error::{EventViewError, Result};
use crate::geometry::{Geometry, GeometryRecord};
use crate::hit::RawHitRecord;
use std::path::Path;
use tracing::info;

/// Parse a JSON array of pulse records
pub fn parse_pulses(content: &str) -> Result<Vec<RawHitRecord>> {
    serde_json::from_str(content)
        .map_err(|e| EventViewError::Parse(format!("Invalid pulse table: {}", e)))
}

/// Parse a JSON array of geometry records
pub fn parse_geometry(content: &str) -> Result<Geometry> {
    let records: Vec<GeometryRecord> = serde_json::from_str(content)
        .map_err(|e| EventViewError::Parse(format!("Invalid geometry table: {}", e)))?;
    Ok(records.into_iter().collect())
}

pub fn load_pulses(path: &Path) -> Result<Vec<RawHitRecord>> {
    info!("Reading pulses from {}", path.display());
    let records = parse_pulses(&std::fs::read_to_string(path)?)?;
    info!("Loaded {} pulse records", records.len());
    Ok(records)
}

pub fn load_geometry(path: &Path) -> Result<Geometry> {
    info!("Reading geometry from {}", path.display());
    let geometry = parse_geometry(&std::fs::read_to_string(path)?)?;
    info!("Loaded {} module positions", geometry.len());
    Ok(geometry)
}
