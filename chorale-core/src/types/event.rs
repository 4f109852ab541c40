//! Abstract note/rest events handed to the notation serializer.

use crate::types::note::Note;
use crate::types::time::DurationType;

/// Target staff for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Staff {
    Treble,
    Bass,
}

/// One note or rest, immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MusicalEvent {
    /// Duration in ticks; the ground truth for measure accounting.
    pub duration_ticks: i64,
    pub staff: Staff,
    /// Voice line within the piece (1 = highest).
    pub voice: u8,
    /// None is a rest.
    pub pitch: Option<Note>,
    /// Notated value, a display hint for the serializer.
    pub duration_type: DurationType,
    /// True when this event sounds together with the previous event on the
    /// same voice line (a stacked chord note) and does not advance time.
    pub chord_continuation: bool,
}

impl MusicalEvent {
    pub fn note(
        pitch: Note,
        duration_ticks: i64,
        duration_type: DurationType,
        staff: Staff,
        voice: u8,
    ) -> Self {
        MusicalEvent {
            duration_ticks,
            staff,
            voice,
            pitch: Some(pitch),
            duration_type,
            chord_continuation: false,
        }
    }

    pub fn rest(
        duration_ticks: i64,
        duration_type: DurationType,
        staff: Staff,
        voice: u8,
    ) -> Self {
        MusicalEvent {
            duration_ticks,
            staff,
            voice,
            pitch: None,
            duration_type,
            chord_continuation: false,
        }
    }

    /// Mark the event as sounding with its predecessor on the same voice.
    pub fn as_chord_continuation(mut self) -> Self {
        self.chord_continuation = true;
        self
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }
}

/// One measure of output: the originating chord symbol plus its events.
///
/// Invariant: for each staff/voice pair, the non-continuation events sum
/// exactly to the measure's total tick duration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure {
    pub index: usize,
    /// The roman-numeral token this measure was harmonized from.
    pub symbol: String,
    pub events: Vec<MusicalEvent>,
}

impl Measure {
    pub fn new(index: usize, symbol: impl Into<String>) -> Self {
        Measure {
            index,
            symbol: symbol.into(),
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: MusicalEvent) {
        self.events.push(event);
    }

    /// Events targeting one staff, in order.
    pub fn staff_events(&self, staff: Staff) -> impl Iterator<Item = &MusicalEvent> {
        self.events.iter().filter(move |e| e.staff == staff)
    }

    /// Tick total of the time-advancing events on one staff/voice line.
    pub fn voice_ticks(&self, staff: Staff, voice: u8) -> i64 {
        self.events
            .iter()
            .filter(|e| e.staff == staff && e.voice == voice && !e.chord_continuation)
            .map(|e| e.duration_ticks)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_ticks_ignore_continuations() {
        let mut m = Measure::new(0, "I");
        let c: Note = "C4".parse().unwrap();
        let e: Note = "E4".parse().unwrap();

        m.push(MusicalEvent::note(c, 480, DurationType::Quarter, Staff::Bass, 2));
        m.push(
            MusicalEvent::note(e, 480, DurationType::Quarter, Staff::Bass, 2)
                .as_chord_continuation(),
        );
        m.push(MusicalEvent::rest(480, DurationType::Quarter, Staff::Bass, 2));

        assert_eq!(m.voice_ticks(Staff::Bass, 2), 960);
    }
}
