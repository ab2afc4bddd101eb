// MIDI decode error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// MIDI decode error code constants
///
/// Error code range: 2001-2002
pub struct MidiErrorCodes {}

impl MidiErrorCodes {
    /// Input file could not be read from disk
    pub const READ_FAILED: i32 = 2001;

    /// Input bytes are not a valid standard MIDI file
    pub const PARSE_FAILED: i32 = 2002;
}

/// Log a MIDI decode error with structured context
pub fn log_midi_error(err: &MidiError, context: &str) {
    error!(
        "MIDI error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// MIDI decode errors
///
/// These cover the adapter boundary: when decoding fails, the analysis
/// pipeline is never invoked.
///
/// Error code range: 2001-2002
#[derive(Debug, Clone, PartialEq)]
pub enum MidiError {
    /// Input file could not be read from disk
    ReadFailed { path: String, reason: String },

    /// Input bytes are not a valid standard MIDI file
    ParseFailed { reason: String },
}

impl ErrorCode for MidiError {
    fn code(&self) -> i32 {
        match self {
            MidiError::ReadFailed { .. } => MidiErrorCodes::READ_FAILED,
            MidiError::ParseFailed { .. } => MidiErrorCodes::PARSE_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            MidiError::ReadFailed { path, reason } => {
                format!("Failed to read MIDI file {}: {}", path, reason)
            }
            MidiError::ParseFailed { reason } => {
                format!("Failed to parse MIDI file: {}", reason)
            }
        }
    }
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MidiError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for MidiError {}
