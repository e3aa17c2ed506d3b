//! Error taxonomy for the event display pipeline
//!
//! Empty events and zero-width time windows are not errors; they are
//! handled by explicit policies in the aggregator, window finder and mapper.

use thiserror::Error;

/// Errors that can abort processing of a single event or a whole load
#[derive(Error, Debug)]
pub enum EventViewError {
    #[error("Invalid record at index {index}: field `{field}` {reason}")]
    InvalidRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Degenerate charge: maximum module charge is {max_charge}, radius scaling is undefined")]
    DegenerateCharge { max_charge: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for event display operations
pub type Result<T> = std::result::Result<T, EventViewError>;
