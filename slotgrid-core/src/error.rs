//! Error types for slotgrid.
//!
//! Layout resolution itself never fails; these errors come from the edges
//! (settings, time zone names, scenario and grid descriptions).

use thiserror::Error;

/// Errors that can occur while preparing a layout.
#[derive(Error, Debug)]
pub enum SlotGridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown time zone: {0}")]
    TimeZone(String),

    #[error("Recurrence rule error: {0}")]
    RecurrenceRule(String),

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("Invalid grid: {0}")]
    Grid(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for slotgrid operations.
pub type SlotGridResult<T> = Result<T, SlotGridError>;
