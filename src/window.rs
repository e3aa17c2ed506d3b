//! Minimal coverage time window
//!
//! Finds the narrowest interval of hit times that contains a fixed fraction
//! of an event's hits. The color ramp of the display is stretched over this
//! interval, so a few early noise hits or late afterpulses do not compress
//! the gradient for the bulk of the event.
//!
//! # Window size
//!
//! The window covers `w = floor(f * n)` of the `n` sorted timestamps, so
//! for `[1, 2, 3, 4, 100]` at `f = 0.9` the candidates are `[1, 4]` and
//! `[2, 100]`. A window always holds at least one sample, and when
//! `w >= n` it is the full range.

use crate::hit::HitLog;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Window returned when an event has no hits at all
pub const EMPTY_WINDOW: TimeWindow = TimeWindow {
    time_min: 0.0,
    time_max: 1.0,
};

/// Closed time interval, `time_min <= time_max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub time_min: f64,
    pub time_max: f64,
}

impl TimeWindow {
    /// Create a window from its endpoints
    pub fn new(time_min: f64, time_max: f64) -> Self {
        Self { time_min, time_max }
    }

    /// Duration covered by the window
    pub fn width(&self) -> f64 {
        self.time_max - self.time_min
    }

    /// Whether `time` lies inside the closed interval
    pub fn contains(&self, time: f64) -> bool {
        time >= self.time_min && time <= self.time_max
    }

    /// Position of `time` within the window as a fraction in `[0, 1]`
    ///
    /// A zero-width window maps every time to 0.
    pub fn normalize(&self, time: f64) -> f64 {
        let width = self.width();
        if width == 0.0 {
            0.0
        } else {
            (time - self.time_min) / width
        }
    }
}

/// Number of samples the window covers out of `n`, within `1..=n` for `n > 0`
pub fn window_size(coverage_fraction: f64, n: usize) -> usize {
    // `as` saturates: negative or NaN products give 0
    let w = (coverage_fraction * n as f64).floor() as usize;
    w.clamp(1, n.max(1))
}

/// Narrowest window over a set of timestamps
///
/// Ties in width go to the earliest-starting window.
pub fn find_window(times: &[f64], coverage_fraction: f64) -> TimeWindow {
    if times.is_empty() {
        debug!("No hits, using empty-event window");
        return EMPTY_WINDOW;
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let size = window_size(coverage_fraction, n);
    let mut window = TimeWindow::new(sorted[0], sorted[n - 1]);
    debug!(
        "Initial time range: {:.2} to {:.2}",
        window.time_min, window.time_max
    );

    if size < n {
        let mut min_width = f64::INFINITY;
        for i in 0..=n - size {
            let last = i + size - 1;
            let width = sorted[last] - sorted[i];
            // Strict comparison keeps the first minimal window
            if width < min_width {
                min_width = width;
                window = TimeWindow::new(sorted[i], sorted[last]);
            }
        }
    }

    debug!(
        hits = n,
        size,
        "Final time window: {:.2} to {:.2}",
        window.time_min,
        window.time_max
    );
    window
}

/// Narrowest window over every hit in an event
pub fn find_time_window(log: &HitLog, coverage_fraction: f64) -> TimeWindow {
    find_window(&log.times(), coverage_fraction)
}
