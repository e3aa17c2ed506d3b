//! Detector geometry lookup
//!
//! Maps each module to its position. Modules that appear in hit data but are
//! missing here are skipped by the scene builder, never treated as fatal.

use crate::hit::ModuleKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, Div, Sub};

/// Point in detector coordinates (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Div<f64> for Position {
    type Output = Position;

    fn div(self, rhs: f64) -> Position {
        Position::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// One row of a geometry table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub string: i32,
    pub om: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Read-only module position table
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    positions: BTreeMap<ModuleKey, Position>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module; a later insert for the same key replaces the earlier one
    pub fn insert(&mut self, key: ModuleKey, position: Position) {
        self.positions.insert(key, position);
    }

    /// Position of a module, `None` if it is not in the table
    pub fn position(&self, key: &ModuleKey) -> Option<Position> {
        self.positions.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Lowest-numbered module registered on `string`
    pub fn first_module_on_string(&self, string: i32) -> Option<(ModuleKey, Position)> {
        self.positions
            .range(ModuleKey::new(string, i32::MIN)..=ModuleKey::new(string, i32::MAX))
            .next()
            .map(|(key, pos)| (*key, *pos))
    }
}

impl FromIterator<GeometryRecord> for Geometry {
    fn from_iter<I: IntoIterator<Item = GeometryRecord>>(iter: I) -> Self {
        let mut geometry = Geometry::new();
        for r in iter {
            geometry.insert(ModuleKey::new(r.string, r.om), Position::new(r.x, r.y, r.z));
        }
        geometry
    }
}

/// Arithmetic mean of `positions`, the origin when empty
pub fn centroid(positions: &[Position]) -> Position {
    if positions.is_empty() {
        return Position::ORIGIN;
    }
    positions.iter().fold(Position::ORIGIN, |acc, p| acc + *p) / positions.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        [
            GeometryRecord {
                string: 36,
                om: 2,
                x: 1.0,
                y: 2.0,
                z: -10.0,
            },
            GeometryRecord {
                string: 36,
                om: 1,
                x: 1.0,
                y: 2.0,
                z: 5.0,
            },
            GeometryRecord {
                string: 79,
                om: 40,
                x: -3.0,
                y: 4.0,
                z: -300.0,
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let geo = geometry();
        assert_eq!(geo.len(), 3);
        assert_eq!(
            geo.position(&ModuleKey::new(79, 40)),
            Some(Position::new(-3.0, 4.0, -300.0))
        );
        assert_eq!(geo.position(&ModuleKey::new(1, 1)), None);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let geo: Geometry = [
            GeometryRecord {
                string: 1,
                om: 1,
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            GeometryRecord {
                string: 1,
                om: 1,
                x: 9.0,
                y: 9.0,
                z: 9.0,
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(geo.len(), 1);
        assert_eq!(geo.position(&ModuleKey::new(1, 1)), Some(Position::new(9.0, 9.0, 9.0)));
    }

    #[test]
    fn test_first_module_on_string() {
        let geo = geometry();
        let (key, pos) = geo.first_module_on_string(36).unwrap();
        assert_eq!(key, ModuleKey::new(36, 1));
        assert_eq!(pos.z, 5.0);
        assert!(geo.first_module_on_string(37).is_none());
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&[Position::new(0.0, 0.0, 0.0), Position::new(2.0, 4.0, -6.0)]);
        assert_eq!(c, Position::new(1.0, 2.0, -3.0));
        assert_eq!(centroid(&[]), Position::ORIGIN);
    }
}
