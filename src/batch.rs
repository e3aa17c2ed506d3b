//! Multi-event driver
//!
//! Events share no mutable state: each worker aggregates, windows, maps and
//! places its own event from a shared read-only partition of the pulse table
//! and the geometry. A failing event is reported in its own outcome and does not
//! stop the others.

use crate::aggregate::{aggregate, EventPartition};
use crate::config::EventViewConfig;
use crate::error::EventViewError;
use crate::geometry::Geometry;
use crate::hit::{EventId, HitLog, RawHitRecord};
use crate::scene::{build_scene, EventScene};
use rayon::prelude::*;
use tracing::{error, info, info_span};

/// Result of processing one event
#[derive(Debug)]
pub struct EventOutcome {
    pub event: EventId,
    pub result: Result<EventScene, EventViewError>,
}

impl EventOutcome {
    /// Whether the scene was built
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate and build the scene for a single event
pub fn process_event(
    records: &[RawHitRecord],
    event: EventId,
    geometry: &Geometry,
    config: &EventViewConfig,
) -> Result<EventScene, EventViewError> {
    run_event(event, || aggregate(records, event), geometry, config)
}

/// Process `events` in parallel; outcomes keep the order of `events`
///
/// The table is partitioned by event once up front, so each worker only
/// touches its own rows.
pub fn process_events(
    records: &[RawHitRecord],
    events: &[EventId],
    geometry: &Geometry,
    config: &EventViewConfig,
) -> Vec<EventOutcome> {
    let partition = EventPartition::new(records);

    events
        .par_iter()
        .map(|&event| {
            let result = run_event(event, || partition.aggregate(event), geometry, config);
            if let Err(ref e) = result {
                error!("Failed to process {}: {}", event, e);
            }
            EventOutcome { event, result }
        })
        .collect()
}

fn run_event(
    event: EventId,
    aggregate_hits: impl FnOnce() -> Result<HitLog, EventViewError>,
    geometry: &Geometry,
    config: &EventViewConfig,
) -> Result<EventScene, EventViewError> {
    let span = info_span!("event", run = event.run, event = event.event);
    let _guard = span.enter();

    let log = aggregate_hits()?;
    info!(
        hits = log.hit_count(),
        modules = log.module_count(),
        "Aggregated event"
    );
    let scene = build_scene(event, &log, geometry, config)?;
    info!(
        placed = scene.modules.len(),
        skipped = scene.skipped_modules.len(),
        "Built scene, window {:.2} to {:.2}",
        scene.window.time_min,
        scene.window.time_max
    );
    Ok(scene)
}
