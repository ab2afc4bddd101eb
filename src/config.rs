//! Analysis options and configuration loading
//!
//! This module provides the caller-owned parameter struct for one analysis
//! run, plus optional JSON file loading so batch runs can be tuned without
//! recompilation. Options are validated at the pipeline entry point, never
//! silently coerced.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AnalysisError;

/// Default relative-variation threshold for perturbation detection.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Parameters for one analysis run
///
/// Owned by the caller and passed through each stage; the pipeline keeps no
/// state between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Name shown in reports, usually the input file name.
    #[serde(default)]
    pub display_name: String,
    /// Events dropped from the front of the ordered timeline.
    #[serde(default)]
    pub skip: usize,
    /// Maximum events kept after `skip`; `None` keeps all.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Relative-variation threshold; a transition is flagged when its
    /// variation strictly exceeds this value.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Tempo override in BPM for seconds projections; `None` uses the
    /// tempo decoded from the file.
    #[serde(default)]
    pub bpm: Option<f64>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            skip: 0,
            limit: None,
            threshold: DEFAULT_THRESHOLD,
            bpm: None,
        }
    }
}

impl AnalysisOptions {
    /// Set the display name used in reports.
    pub fn with_display_name<S: Into<String>>(mut self, name: S) -> Self {
        self.display_name = name.into();
        self
    }

    /// Load options from a JSON file
    ///
    /// # Returns
    /// The parsed options, or defaults if the file is missing or invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(options) => {
                    log::info!("[Config] Loaded options from {:?}", path.as_ref());
                    options
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read options file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Validate the options, failing fast on values the pipeline would
    /// otherwise misinterpret.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.threshold.is_nan() || self.threshold <= 0.0 {
            return Err(AnalysisError::ThresholdInvalid {
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}
