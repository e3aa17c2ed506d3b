//! Renderer-ready description of one event
//!
//! Runs window finding and attribute mapping for an event, then places each
//! hit module in space relative to the event centroid and adds a vertical
//! line for every hit string.

use crate::config::EventViewConfig;
use crate::error::Result;
use crate::geometry::{centroid, Geometry, Position};
use crate::hit::{EventId, HitLog, ModuleKey};
use crate::mapper::{map_attributes, ModuleRenderAttributes};
use crate::palette::Color;
use crate::window::{find_time_window, TimeWindow};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A hit module positioned for drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedModule {
    pub key: ModuleKey,
    /// Relative to the event centroid
    pub position: Position,
    pub radius: f64,
    pub color: Color,
    pub total_charge: f64,
    pub average_time: f64,
    pub hit_count: usize,
}

/// Vertical extent of a hit string, relative to the event centroid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLine {
    pub string: i32,
    pub start: Position,
    pub end: Position,
}

/// Everything a renderer needs to draw one event
///
/// Module and string positions are relative to `centroid`, so the event sits
/// at the origin of the drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventScene {
    pub event: EventId,
    pub label: String,
    pub window: TimeWindow,
    /// Absolute detector coordinates
    pub centroid: Position,
    pub modules: Vec<PlacedModule>,
    pub strings: Vec<StringLine>,
    /// Hit modules with no geometry entry
    pub skipped_modules: Vec<ModuleKey>,
}

/// Two-line `Run:` / `Event:` caption shown with the event
pub fn event_label(event: EventId) -> String {
    format!("Run: {}\nEvent: {}", event.run, event.event)
}

/// Build the scene for one aggregated event
///
/// Window and attributes are computed over every hit module, including ones
/// later skipped for lack of geometry. Fails only when the charge policy
/// rejects the event.
pub fn build_scene(
    event: EventId,
    log: &HitLog,
    geometry: &Geometry,
    config: &EventViewConfig,
) -> Result<EventScene> {
    let window = find_time_window(log, config.coverage_fraction);
    let attributes = map_attributes(log, &window, config)?;

    let mut skipped_modules = Vec::new();
    let mut located = Vec::with_capacity(attributes.len());
    for attr in attributes {
        match geometry.position(&attr.key) {
            Some(position) => located.push((attr, position)),
            None => {
                warn!("Module {} not in geometry, skipping", attr.key);
                skipped_modules.push(attr.key);
            }
        }
    }

    let positions: Vec<Position> = located.iter().map(|(_, p)| *p).collect();
    let center = centroid(&positions);
    debug!(
        "Event centroid: ({:.2}, {:.2}, {:.2})",
        center.x, center.y, center.z
    );

    let strings = string_lines(&located, geometry, center);

    let modules = located
        .into_iter()
        .map(|(attr, position)| PlacedModule {
            key: attr.key,
            position: position - center,
            radius: attr.radius,
            color: attr.color,
            total_charge: attr.total_charge,
            average_time: attr.average_time,
            hit_count: attr.hit_count,
        })
        .collect();

    Ok(EventScene {
        event,
        label: event_label(event),
        window,
        centroid: center,
        modules,
        strings,
        skipped_modules,
    })
}

fn string_lines(
    located: &[(ModuleRenderAttributes, Position)],
    geometry: &Geometry,
    center: Position,
) -> Vec<StringLine> {
    let z_range = located
        .iter()
        .map(|(_, p)| p.z)
        .fold(None::<(f64, f64)>, |range, z| match range {
            None => Some((z, z)),
            Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
        });
    let Some((min_z, max_z)) = z_range else {
        return Vec::new();
    };
    debug!("Z-coordinate range: {:.2} to {:.2}", min_z, max_z);

    let hit_strings: BTreeSet<i32> = located.iter().map(|(attr, _)| attr.key.string).collect();

    hit_strings
        .into_iter()
        .filter_map(|string| {
            let (_, anchor) = geometry.first_module_on_string(string)?;
            Some(StringLine {
                string,
                start: Position::new(anchor.x, anchor.y, min_z) - center,
                end: Position::new(anchor.x, anchor.y, max_z) - center,
            })
        })
        .collect()
}
