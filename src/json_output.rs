//! JSON output format for event scenes
//!
//! One document per invocation holding every requested event, so a renderer
//! can consume a batch in a single read.

use crate::batch::EventOutcome;
use crate::hit::EventId;
use crate::scene::EventScene;
use serde::Serialize;

/// A single event: either its scene or the reason it failed
#[derive(Debug, Clone, Serialize)]
pub struct JsonEvent {
    pub id: EventId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<EventScene>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary for the whole batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonSummary {
    pub total_events: usize,
    pub failed_events: usize,
    pub placed_modules: usize,
    pub skipped_modules: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub events: Vec<JsonEvent>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output formatter
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "eventview-json-v1".to_string(),
            events: Vec::new(),
            summary: JsonSummary::default(),
        }
    }

    /// Add an event and update the summary counts
    pub fn add_outcome(&mut self, outcome: &EventOutcome) {
        self.summary.total_events += 1;
        let entry = match &outcome.result {
            Ok(scene) => {
                self.summary.placed_modules += scene.modules.len();
                self.summary.skipped_modules += scene.skipped_modules.len();
                JsonEvent {
                    id: outcome.event,
                    scene: Some(scene.clone()),
                    error: None,
                }
            }
            Err(e) => {
                self.summary.failed_events += 1;
                JsonEvent {
                    id: outcome.event,
                    scene: None,
                    error: Some(e.to_string()),
                }
            }
        };
        self.events.push(entry);
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventViewError;
    use crate::window::TimeWindow;

    fn empty_scene(event: EventId) -> EventScene {
        EventScene {
            event,
            label: crate::scene::event_label(event),
            window: TimeWindow::new(0.0, 1.0),
            centroid: crate::geometry::Position::ORIGIN,
            modules: Vec::new(),
            strings: Vec::new(),
            skipped_modules: Vec::new(),
        }
    }

    #[test]
    fn test_json_header_fields() {
        let output = JsonOutput::new();
        let json = output.to_json().unwrap();
        assert!(json.contains("\"format\": \"eventview-json-v1\""));
        assert!(json.contains("\"total_events\": 0"));
    }

    #[test]
    fn test_json_counts_failures() {
        let mut output = JsonOutput::new();
        output.add_outcome(&EventOutcome {
            event: EventId::new(1, 1),
            result: Ok(empty_scene(EventId::new(1, 1))),
        });
        output.add_outcome(&EventOutcome {
            event: EventId::new(1, 2),
            result: Err(EventViewError::DegenerateCharge { max_charge: 0.0 }),
        });

        assert_eq!(output.summary.total_events, 2);
        assert_eq!(output.summary.failed_events, 1);

        let value: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
        assert!(value["events"][0].get("error").is_none());
        assert!(value["events"][1]["error"]
            .as_str()
            .unwrap()
            .contains("Degenerate charge"));
        assert_eq!(value["events"][0]["scene"]["window"]["time_max"], 1.0);
    }
}
