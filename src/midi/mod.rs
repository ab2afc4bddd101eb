//! MIDI decode adapter.
//!
//! Wraps the `midly` reader behind a plain message model so the analysis
//! pipeline stays independent of the file format. File access happens only
//! in [`loader`]; everything downstream consumes an in-memory
//! [`MessageStream`].

pub mod events;
pub mod loader;
pub mod timing;

pub use events::{MessageKind, MessageStream, TimedMessage};
pub use loader::{decode_bytes, decode_file};
