//! Timeline assembly - global ordering, windowing, and cumulative sums
//!
//! Takes the unordered note events from all tracks and produces the
//! duration sequence the detector scans:
//! - Stable sort by start tick (ties keep track order, then production
//!   order within a track)
//! - Optional skip/limit window over the ordered events
//! - Cumulative tick timeline starting at 0, one element longer than the
//!   duration sequence
//!
//! Building a timeline performs no I/O and leaves the input untouched.

use serde::{Deserialize, Serialize};

use crate::analysis::extraction::NoteEvent;
use crate::error::AnalysisError;
use crate::midi::timing::ticks_to_beats;

/// Window applied to the globally ordered event list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSelection {
    /// Events dropped from the front.
    pub skip: usize,
    /// Maximum events kept after `skip`; `None` keeps all.
    pub limit: Option<usize>,
}

/// Ordered duration data derived from the selected note events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// File resolution the beat projection divides by.
    pub ticks_per_beat: u32,
    /// One duration per selected event, ordered by start tick.
    pub durations: Vec<u64>,
    /// Prefix sums of `durations`, starting at 0.
    pub cumulative_ticks: Vec<u64>,
}

impl Timeline {
    /// Build a timeline from the extracted note events
    ///
    /// # Errors
    /// - `ResolutionInvalid` when `ticks_per_beat` is 0
    /// - `NoEvents` when extraction produced nothing to order
    /// - `EmptySelection` when the window drops every event, which keeps
    ///   "nothing to analyze" distinct from "analyzed, found nothing"
    pub fn build(
        events: &[NoteEvent],
        ticks_per_beat: u32,
        selection: EventSelection,
    ) -> Result<Self, AnalysisError> {
        if ticks_per_beat == 0 {
            return Err(AnalysisError::ResolutionInvalid { ticks_per_beat });
        }
        if events.is_empty() {
            return Err(AnalysisError::NoEvents);
        }

        let mut ordered = events.to_vec();
        // Stable sort: equal start ticks keep ascending track index, then
        // within-track production order.
        ordered.sort_by_key(|event| event.start_tick);

        let durations: Vec<u64> = ordered
            .iter()
            .skip(selection.skip)
            .take(selection.limit.unwrap_or(usize::MAX))
            .map(|event| event.duration_ticks)
            .collect();

        if durations.is_empty() {
            return Err(AnalysisError::EmptySelection {
                skip: selection.skip,
                available: events.len(),
            });
        }

        let mut cumulative_ticks = Vec::with_capacity(durations.len() + 1);
        let mut total: u64 = 0;
        cumulative_ticks.push(total);
        for &duration in &durations {
            total += duration;
            cumulative_ticks.push(total);
        }

        Ok(Self {
            ticks_per_beat,
            durations,
            cumulative_ticks,
        })
    }

    /// Number of selected events.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Total elapsed ticks across the selected events.
    pub fn total_ticks(&self) -> u64 {
        self.cumulative_ticks.last().copied().unwrap_or(0)
    }

    /// Total elapsed time in beats.
    pub fn total_beats(&self) -> f64 {
        ticks_to_beats(self.total_ticks(), self.ticks_per_beat)
    }

    /// Cumulative timeline projected into beats.
    pub fn beat_times(&self) -> Vec<f64> {
        self.cumulative_ticks
            .iter()
            .map(|&ticks| ticks_to_beats(ticks, self.ticks_per_beat))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start_tick: u64, duration_ticks: u64, track: usize) -> NoteEvent {
        NoteEvent {
            start_tick,
            duration_ticks,
            pitch: 60,
            track,
        }
    }

    fn sequential_events(durations: &[u64]) -> Vec<NoteEvent> {
        let mut start = 0;
        durations
            .iter()
            .map(|&duration| {
                let e = event(start, duration, 0);
                start += duration;
                e
            })
            .collect()
    }

    #[test]
    fn test_durations_follow_start_tick_order() {
        let events = vec![event(100, 5, 0), event(0, 7, 0), event(50, 9, 0)];
        let timeline = Timeline::build(&events, 480, EventSelection::default()).unwrap();

        assert_eq!(timeline.durations, vec![7, 9, 5]);
    }

    #[test]
    fn test_equal_starts_keep_track_then_production_order() {
        let events = vec![
            // track 0 produced two events at the same start tick
            event(10, 1, 0),
            event(10, 2, 0),
            // track 1 event at the same start tick
            event(10, 3, 1),
        ];
        let timeline = Timeline::build(&events, 480, EventSelection::default()).unwrap();

        assert_eq!(
            timeline.durations,
            vec![1, 2, 3],
            "stable sort must preserve track then production order"
        );
    }

    #[test]
    fn test_window_skip_and_limit() {
        let events = sequential_events(&[10, 20, 30, 40, 50, 60, 70, 80]);
        let selection = EventSelection {
            skip: 2,
            limit: Some(3),
        };
        let timeline = Timeline::build(&events, 480, selection).unwrap();

        assert_eq!(timeline.durations, vec![30, 40, 50]);
    }

    #[test]
    fn test_unlimited_keeps_everything_after_skip() {
        let events = sequential_events(&[10, 20, 30, 40]);
        let selection = EventSelection {
            skip: 1,
            limit: None,
        };
        let timeline = Timeline::build(&events, 480, selection).unwrap();

        assert_eq!(timeline.durations, vec![20, 30, 40]);
    }

    #[test]
    fn test_cumulative_timeline_starts_at_zero() {
        let events = sequential_events(&[480, 480, 960]);
        let timeline = Timeline::build(&events, 480, EventSelection::default()).unwrap();

        assert_eq!(timeline.cumulative_ticks, vec![0, 480, 960, 1920]);
        assert_eq!(timeline.cumulative_ticks.len(), timeline.durations.len() + 1);
        assert_eq!(timeline.total_ticks(), 1920);
        assert_eq!(timeline.total_beats(), 4.0);
    }

    #[test]
    fn test_beat_times_projection() {
        let events = sequential_events(&[240, 240]);
        let timeline = Timeline::build(&events, 480, EventSelection::default()).unwrap();

        assert_eq!(timeline.beat_times(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_no_events_is_reported() {
        let err = Timeline::build(&[], 480, EventSelection::default())
            .expect_err("empty input must not build");
        assert_eq!(err, AnalysisError::NoEvents);
    }

    #[test]
    fn test_window_past_end_is_reported() {
        let events = sequential_events(&[10, 20]);
        let selection = EventSelection {
            skip: 5,
            limit: None,
        };
        let err = Timeline::build(&events, 480, selection).expect_err("window selects nothing");
        match err {
            AnalysisError::EmptySelection { skip, available } => {
                assert_eq!(skip, 5);
                assert_eq!(available, 2);
            }
            other => panic!("Expected EmptySelection, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        let events = sequential_events(&[10]);
        let err = Timeline::build(&events, 0, EventSelection::default())
            .expect_err("zero ticks per beat must fail");
        assert_eq!(err, AnalysisError::ResolutionInvalid { ticks_per_beat: 0 });
    }
}
