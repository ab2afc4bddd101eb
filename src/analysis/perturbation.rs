//! Perturbation detection - relative-variation test over consecutive durations
//!
//! Scans the ordered duration sequence pairwise and flags each transition
//! whose relative change strictly exceeds the threshold:
//! - `variation = |d_curr - d_prev| / d_prev`
//! - `variation` is infinite when the previous duration is zero ticks, so
//!   a zero-length note always flags its successor under any finite
//!   threshold
//! - A variation exactly equal to the threshold is NOT flagged
//!
//! The scan is a pure function over its inputs; repeated runs on the same
//! timeline yield identical results.

use serde::{Deserialize, Serialize};

use crate::analysis::timeline::Timeline;
use crate::midi::timing::ticks_to_beats;

/// A flagged transition between two consecutive note durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerturbationRecord {
    /// 1-based index of the transition in the duration sequence.
    pub position: usize,
    /// Time of the transition in beats.
    pub time_beats: f64,
    /// Index on the event axis used for plotting.
    pub event_index: usize,
    /// Relative variation; infinite when the previous duration was zero.
    pub variation: f64,
}

/// Outcome of a perturbation scan
///
/// `InsufficientData` (fewer than two durations) is distinct from a
/// completed scan that flagged nothing: the first means nothing could be
/// compared, the second means every transition stayed inside the
/// threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "records", rename_all = "snake_case")]
pub enum PerturbationScan {
    InsufficientData,
    Complete(Vec<PerturbationRecord>),
}

impl PerturbationScan {
    /// Flagged records, empty for an insufficient-data scan.
    pub fn records(&self) -> &[PerturbationRecord] {
        match self {
            PerturbationScan::InsufficientData => &[],
            PerturbationScan::Complete(records) => records,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, PerturbationScan::InsufficientData)
    }

    /// Number of flagged transitions.
    pub fn count(&self) -> usize {
        self.records().len()
    }
}

/// Scan the timeline's duration sequence against a relative-variation
/// threshold
///
/// The threshold is assumed validated by the caller (the pipeline entry
/// rejects non-positive values before any work happens). Records come out
/// in ascending position order.
pub fn detect(timeline: &Timeline, threshold: f64) -> PerturbationScan {
    if timeline.durations.len() < 2 {
        tracing::debug!(
            "perturbation scan skipped: {} duration(s) is insufficient",
            timeline.durations.len()
        );
        return PerturbationScan::InsufficientData;
    }

    let mut records = Vec::new();
    for i in 1..timeline.durations.len() {
        let d_prev = timeline.durations[i - 1];
        let d_curr = timeline.durations[i];

        let variation = if d_prev == 0 {
            f64::INFINITY
        } else {
            (d_curr as f64 - d_prev as f64).abs() / d_prev as f64
        };

        if variation > threshold {
            records.push(PerturbationRecord {
                position: i,
                time_beats: ticks_to_beats(timeline.cumulative_ticks[i], timeline.ticks_per_beat),
                event_index: i,
                variation,
            });
        }
    }

    PerturbationScan::Complete(records)
}
