//! Hit aggregation: filter a raw pulse table down to one event and group
//! its hits by module
//!
//! Also provides the event catalogue used to pick which events to display.

use crate::error::Result;
use crate::hit::{EventId, HitLog, ModuleKey, RawHitRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Per-event totals for a raw pulse table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub id: EventId,
    pub hits: usize,
    pub modules: usize,
}

/// Build the [`HitLog`] for the event matching `selector`
///
/// Records belonging to other events are ignored without being inspected,
/// so a malformed record only fails the event it belongs to. Zero matches
/// yields an empty log.
pub fn aggregate(records: &[RawHitRecord], selector: EventId) -> Result<HitLog> {
    let rows = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.event_id() == selector);
    group_rows(rows, selector)
}

/// Validate and group rows already known to belong to `selector`
fn group_rows<'r>(
    rows: impl Iterator<Item = (usize, &'r RawHitRecord)>,
    selector: EventId,
) -> Result<HitLog> {
    let mut log = HitLog::new();

    for (index, record) in rows {
        record.validate(index)?;
        log.record(record.module_key(), record.hit());
    }

    debug!(
        hits = log.hit_count(),
        modules = log.module_count(),
        "Grouped hits for {}",
        selector
    );
    Ok(log)
}

/// Row indices of a pulse table grouped by event
///
/// Built in a single pass, so aggregating many events does not rescan the
/// table once per event. Rows keep their table order within an event.
#[derive(Debug, Clone)]
pub struct EventPartition<'a> {
    records: &'a [RawHitRecord],
    rows: BTreeMap<EventId, Vec<usize>>,
}

impl<'a> EventPartition<'a> {
    /// Index every row of `records` by its event
    pub fn new(records: &'a [RawHitRecord]) -> Self {
        let mut rows: BTreeMap<EventId, Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            rows.entry(record.event_id()).or_default().push(index);
        }
        debug!(
            records = records.len(),
            events = rows.len(),
            "Partitioned pulse table"
        );
        Self { records, rows }
    }

    pub fn event_count(&self) -> usize {
        self.rows.len()
    }

    /// Table indices of the rows of `event`, empty if it has none
    pub fn rows(&self, event: EventId) -> &[usize] {
        self.rows.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Same result as [`aggregate`] over the full table
    pub fn aggregate(&self, selector: EventId) -> Result<HitLog> {
        let rows = self
            .rows(selector)
            .iter()
            .map(|&index| (index, &self.records[index]));
        group_rows(rows, selector)
    }
}

/// Distinct events in the table, sorted by (run, event)
pub fn list_events(records: &[RawHitRecord]) -> Vec<EventSummary> {
    let mut events: BTreeMap<EventId, (usize, BTreeSet<ModuleKey>)> = BTreeMap::new();

    for record in records {
        let entry = events.entry(record.event_id()).or_default();
        entry.0 += 1;
        entry.1.insert(record.module_key());
    }

    events
        .into_iter()
        .map(|(id, (hits, modules))| EventSummary {
            id,
            hits,
            modules: modules.len(),
        })
        .collect()
}

/// The first `n` events in sorted order
pub fn first_events(records: &[RawHitRecord], n: usize) -> Vec<EventId> {
    list_events(records)
        .into_iter()
        .take(n)
        .map(|summary| summary.id)
        .collect()
}

/// Pick the first event with at least `min_modules` hit modules
///
/// Falls back to the first event in the table when none is large enough.
pub fn select_event(records: &[RawHitRecord], min_modules: usize) -> Option<EventId> {
    let events = list_events(records);

    if let Some(summary) = events.iter().find(|s| s.modules >= min_modules) {
        info!(
            modules = summary.modules,
            "Found {} with >= {} hit modules", summary.id, min_modules
        );
        return Some(summary.id);
    }

    let fallback = events.first().map(|s| s.id);
    if let Some(id) = fallback {
        info!(
            "No events found with >= {} hit modules, falling back to {}",
            min_modules, id
        );
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventViewError;

    fn rec(run: u32, event: u32, string: i32, om: i32, time: f64, charge: f64) -> RawHitRecord {
        RawHitRecord {
            run,
            event,
            string,
            om,
            time,
            charge,
        }
    }

    fn sample_table() -> Vec<RawHitRecord> {
        vec![
            rec(100, 2, 36, 10, 9800.0, 1.2),
            rec(100, 1, 36, 10, 10000.0, 0.5),
            rec(100, 1, 36, 10, 10050.0, 0.75),
            rec(100, 1, 79, 40, 10020.0, 2.0),
            rec(100, 2, 80, 3, 9900.0, 1.0),
            rec(100, 2, 81, 3, 9920.0, 1.0),
            rec(99, 7, 1, 1, 500.0, 1.0),
        ]
    }

    #[test]
    fn test_aggregate_filters_by_selector() {
        let log = aggregate(&sample_table(), EventId::new(100, 1)).unwrap();
        assert_eq!(log.module_count(), 2);
        assert_eq!(log.hit_count(), 3);

        let hits = log.get(&ModuleKey::new(36, 10)).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].time, 10000.0);
        assert_eq!(hits[1].time, 10050.0);
    }

    #[test]
    fn test_aggregate_empty_table() {
        let log = aggregate(&[], EventId::new(1, 1)).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_aggregate_no_matches_is_empty() {
        let log = aggregate(&sample_table(), EventId::new(5, 5)).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_aggregate_invalid_record_fails_only_its_event() {
        let mut table = sample_table();
        table.push(rec(100, 2, 90, 1, f64::NAN, 1.0));

        let err = aggregate(&table, EventId::new(100, 2)).unwrap_err();
        assert!(matches!(
            err,
            EventViewError::InvalidRecord {
                index: 7,
                field: "time",
                ..
            }
        ));
        assert!(aggregate(&table, EventId::new(100, 1)).is_ok());
    }

    #[test]
    fn test_list_events_sorted_with_counts() {
        let events = list_events(&sample_table());
        let ids: Vec<EventId> = events.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![EventId::new(99, 7), EventId::new(100, 1), EventId::new(100, 2)]
        );
        assert_eq!(events[1].hits, 3);
        assert_eq!(events[1].modules, 2);
        assert_eq!(events[2].modules, 3);
    }

    #[test]
    fn test_first_events_truncates() {
        let ids = first_events(&sample_table(), 2);
        assert_eq!(ids, vec![EventId::new(99, 7), EventId::new(100, 1)]);
    }

    #[test]
    fn test_select_event_by_module_count() {
        assert_eq!(
            select_event(&sample_table(), 3),
            Some(EventId::new(100, 2))
        );
    }

    #[test]
    fn test_select_event_falls_back_to_first() {
        assert_eq!(
            select_event(&sample_table(), 25),
            Some(EventId::new(99, 7))
        );
    }

    #[test]
    fn test_select_event_empty_table() {
        assert_eq!(select_event(&[], 1), None);
    }

    #[test]
    fn test_partition_keeps_table_indices() {
        let table = sample_table();
        let partition = EventPartition::new(&table);
        assert_eq!(partition.event_count(), 3);
        assert_eq!(partition.rows(EventId::new(100, 1)), &[1, 2, 3]);
        assert_eq!(partition.rows(EventId::new(100, 2)), &[0, 4, 5]);
        assert!(partition.rows(EventId::new(5, 5)).is_empty());
    }

    #[test]
    fn test_partition_aggregate_matches_table_scan() {
        let table = sample_table();
        let partition = EventPartition::new(&table);
        for summary in list_events(&table) {
            assert_eq!(
                partition.aggregate(summary.id).unwrap(),
                aggregate(&table, summary.id).unwrap()
            );
        }
        assert!(partition.aggregate(EventId::new(5, 5)).unwrap().is_empty());
    }

    #[test]
    fn test_partition_reports_original_row_index() {
        let mut table = sample_table();
        table.push(rec(100, 2, 90, 1, 9950.0, f64::INFINITY));

        let partition = EventPartition::new(&table);
        let err = partition.aggregate(EventId::new(100, 2)).unwrap_err();
        assert!(matches!(
            err,
            EventViewError::InvalidRecord {
                index: 7,
                field: "charge",
                ..
            }
        ));
        assert!(partition.aggregate(EventId::new(100, 1)).is_ok());
    }
}
