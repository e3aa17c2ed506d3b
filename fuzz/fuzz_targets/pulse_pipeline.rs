#![no_main]

use eventview::aggregate::list_events;
use eventview::batch::process_event;
use eventview::config::EventViewConfig;
use eventview::geometry::Geometry;
use eventview::input::parse_pulses;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any pulse table that parses must run through the pipeline without panicking
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(records) = parse_pulses(input) {
            let geometry = Geometry::new();
            let config = EventViewConfig::default();
            for summary in list_events(&records) {
                let _ = process_event(&records, summary.id, &geometry, &config);
            }
        }
    }
});
