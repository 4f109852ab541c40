//! Core musical data types: notes, keys, chords, time, and output events.

pub mod chord;
pub mod event;
pub mod key;
pub mod note;
pub mod time;

pub use chord::{Chord, ChordFactor, ChordQuality, SeventhKind};
pub use event::{Measure, MusicalEvent, Staff};
pub use key::{Key, Mode};
pub use note::{Note, NoteDetails};
pub use time::{DurationType, Meter, Time, TICKS_PER_QUARTER};
