//! Core error types for studyplan-core.
//!
//! This module defines the error hierarchy using thiserror so that loader
//! and configuration failures carry enough context to report to the user
//! without the caller needing to downcast.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for studyplan-core.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Errors reading or parsing the input document.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Errors in the planner-wide configuration values.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors surfaced while reading the input file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors, surfaced when the document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors in the shape or values of the loaded input document.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input file could not be found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The document parsed as JSON but does not match the expected shape.
    #[error("malformed input at {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// An exam's end time is not after its start time.
    #[error("inverted interval for {subject} {paper}: start {start} is not before end {end}")]
    InvertedInterval {
        subject: String,
        paper: String,
        start: String,
        end: String,
    },

    /// An exam date falls outside the planner's start/end window.
    #[error("exam date out of range for {subject} {paper}: {date} is outside [{planner_start}, {planner_end}]")]
    DateOutOfRange {
        subject: String,
        paper: String,
        date: String,
        planner_start: String,
        planner_end: String,
    },
}

/// Errors in planner-wide configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `daily_start` is not strictly before `daily_end`.
    #[error("daily_start ({start}) must be before daily_end ({end})")]
    InvertedDailyWindow { start: String, end: String },

    /// A capacity value (per-day or per-subject) is negative.
    #[error("negative capacity for {field}: {value}")]
    NegativeCapacity { field: String, value: f64 },

    /// The planner's start date is after its end date.
    #[error("planner_start ({start}) must not be after planner_end ({end})")]
    InvertedPlannerWindow { start: String, end: String },
}

/// Result type alias for PlannerError.
pub type Result<T, E = PlannerError> = std::result::Result<T, E>;
