//! eventview - detector event display pipeline
//!
//! Groups raw detector pulses by module, finds the narrowest time window
//! covering most of an event's hits, and maps each module to a radius and a
//! color for an external renderer.
//!
//! ```
//! use eventview::hit::{Hit, HitLog, ModuleKey};
//! use eventview::window::{find_time_window, TimeWindow};
//!
//! let log: HitLog = [1.0, 2.0, 3.0, 4.0, 100.0]
//!     .into_iter()
//!     .map(|t| (ModuleKey::new(36, 1), Hit::new(t, 1.0)))
//!     .collect();
//! assert_eq!(find_time_window(&log, 0.9), TimeWindow::new(1.0, 4.0));
//! ```

pub mod aggregate;
pub mod batch;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod json_output;
pub mod mapper;
pub mod palette;
pub mod scene;
pub mod text_output;
pub mod window;

pub use error::{EventViewError, Result};
