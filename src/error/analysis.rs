// Analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Analysis error code constants
///
/// These constants provide a single source of truth for the codes the CLI
/// prints when a pipeline run fails.
///
/// Error code range: 1001-1004
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Relative-variation threshold is invalid (must be positive)
    pub const THRESHOLD_INVALID: i32 = 1001;

    /// Ticks-per-beat resolution is invalid (must be > 0)
    pub const RESOLUTION_INVALID: i32 = 1002;

    /// No note events were found in any track
    pub const NO_EVENTS: i32 = 1003;

    /// The skip/limit window selected no events
    pub const EMPTY_SELECTION: i32 = 1004;
}

/// Log an analysis error with structured context
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Analysis-related errors
///
/// These cover invalid configuration and empty-result conditions detected
/// by the pipeline. Insufficient data for the perturbation scan is NOT an
/// error; it is a tagged outcome on the scan result.
///
/// Error code range: 1001-1004
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Relative-variation threshold is invalid (must be positive)
    ThresholdInvalid { threshold: f64 },

    /// Ticks-per-beat resolution is invalid (must be > 0)
    ResolutionInvalid { ticks_per_beat: u32 },

    /// No note events were found in any track
    NoEvents,

    /// The skip/limit window selected no events
    EmptySelection { skip: usize, available: usize },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::ThresholdInvalid { .. } => AnalysisErrorCodes::THRESHOLD_INVALID,
            AnalysisError::ResolutionInvalid { .. } => AnalysisErrorCodes::RESOLUTION_INVALID,
            AnalysisError::NoEvents => AnalysisErrorCodes::NO_EVENTS,
            AnalysisError::EmptySelection { .. } => AnalysisErrorCodes::EMPTY_SELECTION,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::ThresholdInvalid { threshold } => {
                format!("Threshold must be a positive number (got {})", threshold)
            }
            AnalysisError::ResolutionInvalid { ticks_per_beat } => {
                format!(
                    "Ticks per beat must be greater than 0 (got {})",
                    ticks_per_beat
                )
            }
            AnalysisError::NoEvents => {
                "No note events found in any track".to_string()
            }
            AnalysisError::EmptySelection { skip, available } => {
                format!(
                    "Selection window is empty: skip {} of {} available events",
                    skip, available
                )
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnalysisError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for AnalysisError {}
