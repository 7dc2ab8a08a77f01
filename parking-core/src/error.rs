//! Error types for the parking roster pipeline.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while turning a roster into reservations.
#[derive(Error, Debug)]
pub enum ParkingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Roster file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Could not read workbook {}: {reason}", .path.display())]
    Workbook { path: PathBuf, reason: String },

    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Sheet '{0}' has no data rows")]
    EmptySheet(String),

    #[error("Sheet '{sheet}', row {row}: invalid date '{value}'. Expected YYYY-MM-DD")]
    MalformedDate {
        sheet: String,
        row: usize,
        value: String,
    },

    #[error("Sheet '{sheet}', row {row}: {reason}")]
    MalformedRow {
        sheet: String,
        row: usize,
        reason: String,
    },

    #[error("Sheet '{sheet}', row {row}: value in column {column} but only {slots} slot columns are labelled")]
    MisalignedRow {
        sheet: String,
        row: usize,
        column: usize,
        slots: usize,
    },

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Unknown employee code '{code}' on {date} (slot {slot})")]
    UnknownEmployee {
        code: String,
        date: NaiveDate,
        slot: String,
    },

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for roster pipeline operations.
pub type ParkingResult<T> = Result<T, ParkingError>;
