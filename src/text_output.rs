//! Human-readable event summaries

use crate::aggregate::EventSummary;
use crate::batch::EventOutcome;
use std::fmt::Write;

/// Text block for one processed event
pub fn format_outcome(outcome: &EventOutcome) -> String {
    let mut out = String::new();
    let id = outcome.event;

    let scene = match &outcome.result {
        Ok(scene) => scene,
        Err(e) => {
            let _ = writeln!(out, "Run {} Event {}: FAILED: {}", id.run, id.event, e);
            return out;
        }
    };

    let _ = writeln!(out, "Run {} Event {}", id.run, id.event);
    let _ = writeln!(
        out,
        "  time window: {:.2} to {:.2}",
        scene.window.time_min, scene.window.time_max
    );
    let _ = writeln!(
        out,
        "  centroid: ({:.2}, {:.2}, {:.2})",
        scene.centroid.x, scene.centroid.y, scene.centroid.z
    );
    let _ = writeln!(
        out,
        "  modules: {} placed, {} without geometry, {} strings",
        scene.modules.len(),
        scene.skipped_modules.len(),
        scene.strings.len()
    );
    for m in &scene.modules {
        let _ = writeln!(
            out,
            "  {:>4} {:>3}  Qtot {:>8.2}  tave {:>10.2}  r {:>6.2}  {}",
            m.key.string, m.key.om, m.total_charge, m.average_time, m.radius, m.color
        );
    }
    out
}

/// Table of events in a pulse table
pub fn format_event_list(events: &[EventSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>10} {:>10} {:>8} {:>8}", "run", "event", "hits", "modules");
    for e in events {
        let _ = writeln!(
            out,
            "{:>10} {:>10} {:>8} {:>8}",
            e.id.run, e.id.event, e.hits, e.modules
        );
    }
    let _ = writeln!(out, "{} events", events.len());
    out
}
