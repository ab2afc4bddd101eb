//! Human-readable report rendering over the analysis bundle.
//!
//! Pure string building; the CLI decides where the text goes. JSON output
//! comes from serializing the bundle directly, not from this module.

use std::fmt::Write;

use crate::analysis::PerturbationAnalysis;

/// Maximum perturbations listed in the detail section.
const DETAIL_LIMIT: usize = 20;

/// One-line summary of an analysis run.
pub fn render_summary(analysis: &PerturbationAnalysis) -> String {
    format!(
        "{}: {} events, {:.2} beats, {} perturbation(s)",
        analysis.source_name,
        analysis.event_count,
        analysis.total_beats,
        analysis.scan.count()
    )
}

/// Full report: totals, tempo, and a detail listing of the first flagged
/// positions, capped at 20 entries.
pub fn render_report(analysis: &PerturbationAnalysis) -> String {
    let mut out = String::new();
    let rule = "=".repeat(70);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "PERTURBATION REPORT - {}", analysis.source_name);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Events analyzed: {}", analysis.event_count);
    let _ = writeln!(out, "Total duration: {:.2} beats", analysis.total_beats);
    let _ = writeln!(
        out,
        "Total duration: {:.2} seconds ({:.2} minutes)",
        analysis.total_seconds,
        analysis.total_seconds / 60.0
    );
    let _ = writeln!(out, "Tempo: {:.1} BPM", analysis.bpm);

    if analysis.scan.is_insufficient() {
        let _ = writeln!(
            out,
            "Insufficient data for perturbation analysis (fewer than 2 durations)"
        );
        let _ = writeln!(out, "{rule}");
        return out;
    }

    let records = analysis.scan.records();
    let _ = writeln!(out, "Perturbation indices: {}", records.len());

    if !records.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "PERTURBATION DETAIL:");
        let _ = writeln!(out, "{}", "-".repeat(50));
        for (line, record) in records.iter().take(DETAIL_LIMIT).enumerate() {
            let _ = writeln!(
                out,
                "{:3}. Ip{}: {:.2} beats, variation {}",
                line + 1,
                record.position,
                record.time_beats,
                format_variation(record.variation)
            );
        }
        if records.len() > DETAIL_LIMIT {
            let _ = writeln!(
                out,
                "... and {} more perturbation(s)",
                records.len() - DETAIL_LIMIT
            );
        }
    }

    let _ = writeln!(out, "{rule}");
    out
}

fn format_variation(variation: f64) -> String {
    if variation.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.1}%", variation * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::perturbation::{PerturbationRecord, PerturbationScan};

    fn analysis_with_scan(scan: PerturbationScan) -> PerturbationAnalysis {
        PerturbationAnalysis {
            source_name: "song.mid".to_string(),
            ticks_per_beat: 480,
            bpm: 120.0,
            event_count: 5,
            durations: vec![480; 5],
            cumulative_ticks: vec![0, 480, 960, 1440, 1920, 2400],
            beat_times: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            total_beats: 5.0,
            total_seconds: 2.5,
            threshold: 0.1,
            scan,
        }
    }

    fn record(position: usize, variation: f64) -> PerturbationRecord {
        PerturbationRecord {
            position,
            time_beats: position as f64,
            event_index: position,
            variation,
        }
    }

    #[test]
    fn test_report_includes_totals_and_detail() {
        let analysis =
            analysis_with_scan(PerturbationScan::Complete(vec![record(3, 1.0), record(4, 0.5)]));
        let report = render_report(&analysis);

        assert!(report.contains("PERTURBATION REPORT - song.mid"));
        assert!(report.contains("Events analyzed: 5"));
        assert!(report.contains("Total duration: 5.00 beats"));
        assert!(report.contains("Tempo: 120.0 BPM"));
        assert!(report.contains("Perturbation indices: 2"));
        assert!(report.contains("Ip3: 3.00 beats, variation 100.0%"));
        assert!(report.contains("Ip4: 4.00 beats, variation 50.0%"));
    }

    #[test]
    fn test_report_marks_insufficient_data() {
        let analysis = analysis_with_scan(PerturbationScan::InsufficientData);
        let report = render_report(&analysis);

        assert!(report.contains("Insufficient data"));
        assert!(!report.contains("Perturbation indices:"));
    }

    #[test]
    fn test_report_caps_detail_listing() {
        let records: Vec<PerturbationRecord> = (1..=25).map(|i| record(i, 0.5)).collect();
        let analysis = analysis_with_scan(PerturbationScan::Complete(records));
        let report = render_report(&analysis);

        assert!(report.contains("Ip20:"));
        assert!(!report.contains("Ip21:"));
        assert!(report.contains("... and 5 more perturbation(s)"));
    }

    #[test]
    fn test_infinite_variation_formatting() {
        let analysis =
            analysis_with_scan(PerturbationScan::Complete(vec![record(1, f64::INFINITY)]));
        let report = render_report(&analysis);

        assert!(report.contains("variation inf"));
    }

    #[test]
    fn test_summary_line() {
        let analysis = analysis_with_scan(PerturbationScan::Complete(vec![record(2, 0.3)]));
        let summary = render_summary(&analysis);

        assert_eq!(summary, "song.mid: 5 events, 5.00 beats, 1 perturbation(s)");
    }
}
