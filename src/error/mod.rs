// Error types for the perturbation analyzer
//
// This module defines custom error types for MIDI decoding and analysis
// operations, providing structured error handling with error codes suitable
// for the CLI exit protocol.

mod analysis;
mod midi;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};
pub use midi::{log_midi_error, MidiError, MidiErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling at the
/// CLI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
