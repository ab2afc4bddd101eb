//! Tick/beat/second conversions.
//!
//! Pure functions used for display projections only; the perturbation
//! detector itself operates on raw ticks.

/// Tempo assumed when a file carries no set_tempo event.
pub const DEFAULT_BPM: f64 = 120.0;

/// Converts a set_tempo value (microseconds per beat) to BPM.
///
/// # Examples
/// ```
/// use midi_perturbation::midi::timing::bpm_from_tempo;
/// assert_eq!(bpm_from_tempo(500_000), 120.0);
/// assert_eq!(bpm_from_tempo(600_000), 100.0);
/// ```
#[inline]
pub fn bpm_from_tempo(microseconds_per_beat: u32) -> f64 {
    60_000_000.0 / microseconds_per_beat as f64
}

/// Converts an absolute tick count to musical beats.
///
/// # Examples
/// ```
/// use midi_perturbation::midi::timing::ticks_to_beats;
/// assert_eq!(ticks_to_beats(960, 480), 2.0);
/// ```
#[inline]
pub fn ticks_to_beats(ticks: u64, ticks_per_beat: u32) -> f64 {
    ticks as f64 / ticks_per_beat as f64
}

/// Converts an absolute tick count to seconds at a fixed tempo.
///
/// Formula: seconds = ticks / ticks_per_beat × 60 / bpm
///
/// # Examples
/// ```
/// use midi_perturbation::midi::timing::ticks_to_seconds;
/// // Two beats at 120 BPM take one second.
/// assert_eq!(ticks_to_seconds(960, 480, 120.0), 1.0);
/// ```
#[inline]
pub fn ticks_to_seconds(ticks: u64, ticks_per_beat: u32, bpm: f64) -> f64 {
    ticks_to_beats(ticks, ticks_per_beat) * 60.0 / bpm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpm_from_tempo_formula() {
        // 500000 microseconds per beat = 120 BPM
        assert!((bpm_from_tempo(500_000) - 120.0).abs() < 1e-9);
        // 400000 microseconds per beat = 150 BPM
        assert!((bpm_from_tempo(400_000) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_ticks_to_beats_at_common_resolutions() {
        assert_eq!(ticks_to_beats(480, 480), 1.0);
        assert_eq!(ticks_to_beats(240, 480), 0.5);
        assert_eq!(ticks_to_beats(0, 480), 0.0);
        assert_eq!(ticks_to_beats(96, 96), 1.0);
    }

    #[test]
    fn test_ticks_to_seconds_at_various_tempi() {
        // One beat at 60 BPM = 1 second
        assert!((ticks_to_seconds(480, 480, 60.0) - 1.0).abs() < 1e-9);
        // One beat at 120 BPM = 0.5 seconds
        assert!((ticks_to_seconds(480, 480, 120.0) - 0.5).abs() < 1e-9);
        // Four beats at 240 BPM = 1 second
        assert!((ticks_to_seconds(1920, 480, 240.0) - 1.0).abs() < 1e-9);
    }
}
