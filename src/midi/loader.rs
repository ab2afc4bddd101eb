//! MIDI file decoding via `midly`.
//!
//! This is the adapter side of the pipeline: it turns a standard MIDI file
//! into a [`MessageStream`](crate::midi::MessageStream) and is the only
//! module that knows about the on-disk format. Decode failures surface here
//! as [`MidiError`]; the analysis stages never see a malformed file.

use std::fs;
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::MidiError;
use crate::midi::events::{MessageKind, MessageStream, TimedMessage};
use crate::midi::timing::{bpm_from_tempo, DEFAULT_BPM};

/// Decode a MIDI file from disk.
pub fn decode_file(path: &Path) -> Result<MessageStream, MidiError> {
    let data = fs::read(path).map_err(|err| MidiError::ReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    decode_bytes(&data)
}

/// Decode a MIDI file already loaded into memory.
///
/// Ticks per beat come from the header: metrical timing directly, SMPTE
/// timecode approximated as `fps × ticks_per_frame / 2` (assumes 120 BPM).
/// The earliest set_tempo event across all tracks sets the file tempo,
/// with ties going to the lower track index; files without one default to
/// 120 BPM.
pub fn decode_bytes(data: &[u8]) -> Result<MessageStream, MidiError> {
    let smf = Smf::parse(data).map_err(|err| MidiError::ParseFailed {
        reason: err.to_string(),
    })?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(tpb) => u32::from(tpb.as_int()),
        Timing::Timecode(fps, ticks_per_frame) => {
            (fps.as_f32() * ticks_per_frame as f32 / 2.0) as u32
        }
    };

    // (absolute tick, microseconds per beat) of the earliest tempo event
    let mut tempo: Option<(u64, u32)> = None;
    let mut tracks = Vec::with_capacity(smf.tracks.len());

    for track in &smf.tracks {
        let mut current_tick: u64 = 0;
        let mut messages = Vec::with_capacity(track.len());

        for event in track {
            let delta_ticks = event.delta.as_int();
            current_tick += u64::from(delta_ticks);

            let kind = match event.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, vel },
                    ..
                } => MessageKind::NoteOn {
                    pitch: key.as_int(),
                    velocity: vel.as_int(),
                },
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { key, .. },
                    ..
                } => MessageKind::NoteOff {
                    pitch: key.as_int(),
                },
                TrackEventKind::Meta(MetaMessage::Tempo(value)) => {
                    let earlier = tempo.map(|(tick, _)| current_tick < tick).unwrap_or(true);
                    if earlier {
                        tempo = Some((current_tick, value.as_int()));
                    }
                    MessageKind::Other
                }
                _ => MessageKind::Other,
            };

            messages.push(TimedMessage { delta_ticks, kind });
        }

        tracks.push(messages);
    }

    let bpm = tempo
        .map(|(_, microseconds_per_beat)| bpm_from_tempo(microseconds_per_beat))
        .unwrap_or(DEFAULT_BPM);

    tracing::debug!(
        "decoded {} tracks at {} ticks/beat, {:.2} BPM",
        tracks.len(),
        ticks_per_beat,
        bpm
    );

    Ok(MessageStream {
        tracks,
        ticks_per_beat,
        bpm,
    })
}
