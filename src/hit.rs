//! Core hit data model
//!
//! A physics event is a set of timestamped, charge-weighted detections, each
//! attributed to one detector module. Raw records arrive as a flat table and
//! are validated here before they are grouped into a [`HitLog`].

use crate::error::{EventViewError, Result};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Identifies a detector module: a string (structural group) and an optical
/// module position on that string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleKey {
    pub string: i32,
    pub om: i32,
}

impl ModuleKey {
    /// Create a key for module `om` on `string`
    pub fn new(string: i32, om: i32) -> Self {
        Self { string, om }
    }
}

impl std::fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.string, self.om)
    }
}

/// Partition key selecting one physics event out of a raw record table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId {
    pub run: u32,
    pub event: u32,
}

impl EventId {
    /// Create an event identifier
    pub fn new(run: u32, event: u32) -> Self {
        Self { run, event }
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run {} event {}", self.run, self.event)
    }
}

/// A single detection: arrival time and deposited charge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub time: f64,
    pub charge: f64,
}

impl Hit {
    pub fn new(time: f64, charge: f64) -> Self {
        Self { time, charge }
    }
}

/// One row of the raw pulse table, with every field the aggregator reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawHitRecord {
    pub run: u32,
    pub event: u32,
    pub string: i32,
    pub om: i32,
    pub time: f64,
    pub charge: f64,
}

impl RawHitRecord {
    /// Event this record belongs to
    pub fn event_id(&self) -> EventId {
        EventId::new(self.run, self.event)
    }

    /// Module that produced this record
    pub fn module_key(&self) -> ModuleKey {
        ModuleKey::new(self.string, self.om)
    }

    /// Time and charge of this record
    pub fn hit(&self) -> Hit {
        Hit::new(self.time, self.charge)
    }

    /// Reject records whose numeric fields would silently poison the
    /// window and mapper stages
    pub fn validate(&self, index: usize) -> Result<()> {
        if !self.time.is_finite() {
            return Err(EventViewError::InvalidRecord {
                index,
                field: "time",
                reason: format!("is not finite ({})", self.time),
            });
        }
        if !self.charge.is_finite() {
            return Err(EventViewError::InvalidRecord {
                index,
                field: "charge",
                reason: format!("is not finite ({})", self.charge),
            });
        }
        Ok(())
    }
}

/// Hits of one physics event grouped by module
///
/// Within a module, hits keep the order they appeared in the source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitLog {
    modules: BTreeMap<ModuleKey, Vec<Hit>>,
}

impl HitLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hit to a module's sequence
    pub fn record(&mut self, key: ModuleKey, hit: Hit) {
        self.modules.entry(key).or_default().push(hit);
    }

    /// Whether no module has recorded a hit
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of distinct hit modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Total number of hits across all modules
    pub fn hit_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    /// Hits of one module, in source order
    pub fn get(&self, key: &ModuleKey) -> Option<&[Hit]> {
        self.modules.get(key).map(Vec::as_slice)
    }

    /// Modules and their hits, ordered by module key
    pub fn iter(&self) -> btree_map::Iter<'_, ModuleKey, Vec<Hit>> {
        self.modules.iter()
    }

    /// Hit modules in key order
    pub fn keys(&self) -> impl Iterator<Item = &ModuleKey> {
        self.modules.keys()
    }

    /// Every timestamp in the event, in no particular order
    pub fn times(&self) -> Vec<f64> {
        self.modules
            .values()
            .flat_map(|hits| hits.iter().map(|h| h.time))
            .collect()
    }
}

impl<'a> IntoIterator for &'a HitLog {
    type Item = (&'a ModuleKey, &'a Vec<Hit>);
    type IntoIter = btree_map::Iter<'a, ModuleKey, Vec<Hit>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(ModuleKey, Hit)> for HitLog {
    fn from_iter<I: IntoIterator<Item = (ModuleKey, Hit)>>(iter: I) -> Self {
        let mut log = HitLog::new();
        for (key, hit) in iter {
            log.record(key, hit);
        }
        log
    }
}
