//! In-memory message model produced by the MIDI decode adapter.
//!
//! The analysis pipeline never touches `midly` types directly; it consumes
//! these plain structs so synthetic streams can be built in tests without a
//! file on disk.

use serde::{Deserialize, Serialize};

/// Payload of a single track message.
///
/// Only note messages carry data the analysis reads. Everything else
/// (tempo, control changes, meta events) collapses into `Other`, whose
/// delta still advances the track clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
    Other,
}

/// A track message with its relative-time delta in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedMessage {
    /// Ticks since the previous message on the same track.
    pub delta_ticks: u32,
    pub kind: MessageKind,
}

impl TimedMessage {
    pub fn note_on(delta_ticks: u32, pitch: u8, velocity: u8) -> Self {
        Self {
            delta_ticks,
            kind: MessageKind::NoteOn { pitch, velocity },
        }
    }

    pub fn note_off(delta_ticks: u32, pitch: u8) -> Self {
        Self {
            delta_ticks,
            kind: MessageKind::NoteOff { pitch },
        }
    }

    pub fn other(delta_ticks: u32) -> Self {
        Self {
            delta_ticks,
            kind: MessageKind::Other,
        }
    }
}

/// A decoded MIDI file: per-track message lists plus file-level timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageStream {
    /// Tracks in file order; each track's messages in file order.
    pub tracks: Vec<Vec<TimedMessage>>,
    /// Ticks per quarter note from the file header.
    pub ticks_per_beat: u32,
    /// Tempo of the earliest set_tempo event, or 120.0 when the file
    /// carries none.
    pub bpm: f64,
}

impl MessageStream {
    /// Total number of messages across all tracks.
    pub fn message_count(&self) -> usize {
        self.tracks.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(
            TimedMessage::note_on(5, 60, 90).kind,
            MessageKind::NoteOn {
                pitch: 60,
                velocity: 90
            }
        );
        assert_eq!(
            TimedMessage::note_off(0, 60).kind,
            MessageKind::NoteOff { pitch: 60 }
        );
        assert_eq!(TimedMessage::other(12).kind, MessageKind::Other);
    }

    #[test]
    fn test_message_count_sums_tracks() {
        let stream = MessageStream {
            tracks: vec![
                vec![TimedMessage::other(0), TimedMessage::other(1)],
                vec![TimedMessage::note_on(0, 60, 100)],
            ],
            ticks_per_beat: 480,
            bpm: 120.0,
        };
        assert_eq!(stream.message_count(), 3);
    }
}
