// Analysis module - perturbation-index pipeline for note timing data
//
// This module orchestrates the complete analysis pipeline, turning a decoded
// message stream into the serializable result bundle handed to reporting and
// plotting consumers.
//
// Architecture:
// - Pipeline: extraction -> Timeline -> PerturbationScan
// - Each run owns all of its state; nothing is shared between runs

use serde::{Deserialize, Serialize};

use crate::config::AnalysisOptions;
use crate::error::AnalysisError;
use crate::midi::timing::ticks_to_seconds;
use crate::midi::MessageStream;

pub mod extraction;
pub mod perturbation;
pub mod timeline;

use extraction::extract_all;
use perturbation::{detect, PerturbationScan};
use timeline::{EventSelection, Timeline};

/// Complete result of one analysis run
///
/// A plain data bundle with no behavior beyond accessors: the duration
/// sequence, the cumulative timeline with its beat projection, display
/// totals, and the perturbation scan outcome. Serialized as-is for
/// downstream reporting and plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationAnalysis {
    /// Display name provided by the caller, usually the input file name.
    pub source_name: String,
    pub ticks_per_beat: u32,
    /// Tempo used for seconds projections.
    pub bpm: f64,
    /// Number of selected note events.
    pub event_count: usize,
    /// Duration sequence in ticks, ordered by start tick.
    pub durations: Vec<u64>,
    /// Cumulative tick timeline, starting at 0.
    pub cumulative_ticks: Vec<u64>,
    /// Cumulative timeline projected into beats.
    pub beat_times: Vec<f64>,
    pub total_beats: f64,
    pub total_seconds: f64,
    /// Threshold the scan ran with.
    pub threshold: f64,
    pub scan: PerturbationScan,
}

/// Run the full pipeline over a decoded message stream
///
/// Stages: validate options, pair notes per track, build the ordered
/// timeline under the skip/limit window, scan for perturbations, assemble
/// the bundle.
///
/// # Errors
/// - `ThresholdInvalid` for a non-positive or NaN threshold
/// - `ResolutionInvalid` for a zero ticks-per-beat stream
/// - `NoEvents` when no track contains a matched note pair
/// - `EmptySelection` when the window drops every event
pub fn analyze_stream(
    stream: &MessageStream,
    options: &AnalysisOptions,
) -> Result<PerturbationAnalysis, AnalysisError> {
    options.validate()?;

    let events = extract_all(stream);
    tracing::info!(
        "extracted {} note events from {} tracks",
        events.len(),
        stream.tracks.len()
    );

    let selection = EventSelection {
        skip: options.skip,
        limit: options.limit,
    };
    let timeline = Timeline::build(&events, stream.ticks_per_beat, selection)?;

    let scan = detect(&timeline, options.threshold);
    tracing::info!(
        "{} perturbation(s) flagged over {} selected events",
        scan.count(),
        timeline.len()
    );

    let bpm = options.bpm.unwrap_or(stream.bpm);
    let total_seconds = ticks_to_seconds(timeline.total_ticks(), timeline.ticks_per_beat, bpm);

    Ok(PerturbationAnalysis {
        source_name: options.display_name.clone(),
        ticks_per_beat: timeline.ticks_per_beat,
        bpm,
        event_count: timeline.len(),
        durations: timeline.durations.clone(),
        beat_times: timeline.beat_times(),
        total_beats: timeline.total_beats(),
        total_seconds,
        threshold: options.threshold,
        cumulative_ticks: timeline.cumulative_ticks,
        scan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::TimedMessage;

    /// One track of back-to-back notes with the given durations.
    fn stream_with_durations(durations: &[u32]) -> MessageStream {
        let mut track = Vec::new();
        for &duration in durations {
            track.push(TimedMessage::note_on(0, 60, 100));
            track.push(TimedMessage::note_off(duration, 60));
        }
        MessageStream {
            tracks: vec![track],
            ticks_per_beat: 480,
            bpm: 120.0,
        }
    }

    #[test]
    fn test_analyze_assembles_bundle() {
        let stream = stream_with_durations(&[480, 480, 960]);
        let options = AnalysisOptions::default().with_display_name("test.mid");
        let analysis = analyze_stream(&stream, &options).unwrap();

        assert_eq!(analysis.source_name, "test.mid");
        assert_eq!(analysis.event_count, 3);
        assert_eq!(analysis.durations, vec![480, 480, 960]);
        assert_eq!(analysis.cumulative_ticks, vec![0, 480, 960, 1920]);
        assert_eq!(analysis.beat_times, vec![0.0, 1.0, 2.0, 4.0]);
        assert_eq!(analysis.total_beats, 4.0);
        // 4 beats at 120 BPM = 2 seconds
        assert!((analysis.total_seconds - 2.0).abs() < 1e-9);
        assert_eq!(analysis.scan.count(), 1);
    }

    #[test]
    fn test_analyze_rejects_bad_threshold_before_extraction() {
        let stream = stream_with_durations(&[480]);
        let mut options = AnalysisOptions::default();
        options.threshold = 0.0;

        let err = analyze_stream(&stream, &options).expect_err("zero threshold must fail");
        assert_eq!(err, AnalysisError::ThresholdInvalid { threshold: 0.0 });
    }

    #[test]
    fn test_analyze_reports_no_events() {
        let stream = MessageStream {
            tracks: vec![vec![TimedMessage::other(10), TimedMessage::other(20)]],
            ticks_per_beat: 480,
            bpm: 120.0,
        };
        let err = analyze_stream(&stream, &AnalysisOptions::default())
            .expect_err("note-free stream must report NoEvents");
        assert_eq!(err, AnalysisError::NoEvents);
    }

    #[test]
    fn test_analyze_tags_insufficient_data() {
        let stream = stream_with_durations(&[480]);
        let analysis = analyze_stream(&stream, &AnalysisOptions::default()).unwrap();

        assert!(analysis.scan.is_insufficient());
        assert_eq!(analysis.event_count, 1);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let stream = stream_with_durations(&[480, 960, 240, 720]);
        let options = AnalysisOptions::default();

        let first = analyze_stream(&stream, &options).unwrap();
        let second = analyze_stream(&stream, &options).unwrap();
        assert_eq!(first, second, "repeated runs must match exactly");
    }

    #[test]
    fn test_bpm_override_changes_seconds_only() {
        let stream = stream_with_durations(&[480, 480]);

        let baseline = analyze_stream(&stream, &AnalysisOptions::default()).unwrap();
        let mut options = AnalysisOptions::default();
        options.bpm = Some(60.0);
        let overridden = analyze_stream(&stream, &options).unwrap();

        assert_eq!(baseline.total_beats, overridden.total_beats);
        assert_eq!(baseline.scan, overridden.scan);
        assert!((overridden.total_seconds - baseline.total_seconds * 2.0).abs() < 1e-9);
    }
}
