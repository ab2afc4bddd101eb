//! Note pairing - converts raw track messages into discrete note events
//!
//! Key invariants:
//! - At most one open start tick per pitch per track; a reopened pitch
//!   overwrites the unmatched start (the earlier note-on is dropped)
//! - A note-off with no open entry is ignored
//! - Notes still open at end of track are discarded, never emitted
//! - Track time is the cumulative delta sum up to and including a message,
//!   so durations are always non-negative
//!
//! Each track is paired independently; no state crosses tracks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::midi::{MessageKind, MessageStream, TimedMessage};

/// A matched note-on/note-off pair representing one sounded note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Absolute tick of the note-on.
    pub start_tick: u64,
    /// Tick distance from the note-on to its matching note-off.
    pub duration_ticks: u64,
    /// MIDI pitch (0-127).
    pub pitch: u8,
    /// Index of the track that produced the note.
    pub track: usize,
}

/// Pair the note messages of a single track into note events
///
/// A note-on with velocity 0 counts as a note-off, per the MIDI running
/// convention. Events are emitted in off-message order, which keeps the
/// within-track production order stable for the timeline sort.
pub fn extract_track(messages: &[TimedMessage], track: usize) -> Vec<NoteEvent> {
    let mut current_tick: u64 = 0;
    // pitch of the currently open note-on -> its start tick
    let mut active: HashMap<u8, u64> = HashMap::new();
    let mut events = Vec::new();

    for message in messages {
        current_tick += u64::from(message.delta_ticks);

        match message.kind {
            MessageKind::NoteOn { pitch, velocity } if velocity > 0 => {
                // A reopened pitch replaces the unmatched start.
                active.insert(pitch, current_tick);
            }
            MessageKind::NoteOn { pitch, .. } | MessageKind::NoteOff { pitch } => {
                if let Some(start_tick) = active.remove(&pitch) {
                    events.push(NoteEvent {
                        start_tick,
                        duration_ticks: current_tick - start_tick,
                        pitch,
                        track,
                    });
                }
            }
            MessageKind::Other => {}
        }
    }

    // Anything left in `active` has no matching off and is dropped here.
    events
}

/// Extract note events from every track, in file order.
pub fn extract_all(stream: &MessageStream) -> Vec<NoteEvent> {
    let mut events = Vec::new();
    for (track, messages) in stream.tracks.iter().enumerate() {
        let track_events = extract_track(messages, track);
        tracing::debug!("track {}: {} note events", track, track_events.len());
        events.extend(track_events);
    }
    events
}
