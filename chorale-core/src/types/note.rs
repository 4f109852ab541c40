use crate::error::{invalid_input, HarmonyError, Result};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Represents a musical note using chromatic representation (0-11)
/// 0=C, 1=C#/Db, 2=D, 3=D#/Eb, 4=E, 5=F, 6=F#/Gb, 7=G, 8=G#/Ab, 9=A, 10=A#/Bb, 11=B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pitch_class: u8, // 0-11 chromatic representation
    octave: i8,      // Standard scientific pitch notation (4 = middle C)
    accidental_preference: AccidentalPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum AccidentalPreference {
    Sharp,
    Flat,
    Natural,
}

/// Spelled-out note name components, as consumed by notation backends:
/// a letter A-G, an accidental alteration in semitones, and an octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteDetails {
    pub letter: char,
    pub alter: i8,
    pub octave: i8,
}

impl Note {
    /// Create a new note from chromatic pitch class (0-11), defaulting to octave 4
    pub fn new(pitch_class: u8) -> Result<Self> {
        if pitch_class > 11 {
            return Err(invalid_input!("Pitch class must be 0-11, got {}", pitch_class));
        }

        Ok(Note {
            pitch_class,
            octave: 4,
            accidental_preference: AccidentalPreference::Natural,
        })
    }

    /// Create a new note with explicit octave
    pub fn new_with_octave(pitch_class: u8, octave: i8) -> Result<Self> {
        if pitch_class > 11 {
            return Err(invalid_input!("Pitch class must be 0-11, got {}", pitch_class));
        }

        Ok(Note {
            pitch_class,
            octave,
            accidental_preference: AccidentalPreference::Natural,
        })
    }

    /// Create a note with specific accidental preference
    pub fn with_accidental_preference(pitch_class: u8, sharp: bool) -> Result<Self> {
        if pitch_class > 11 {
            return Err(invalid_input!("Pitch class must be 0-11, got {}", pitch_class));
        }

        let preference = if Self::is_natural_note(pitch_class) {
            AccidentalPreference::Natural
        } else if sharp {
            AccidentalPreference::Sharp
        } else {
            AccidentalPreference::Flat
        };

        Ok(Note {
            pitch_class,
            octave: 4,
            accidental_preference: preference,
        })
    }

    /// Create a note from a MIDI pitch number (0-127, middle C = 60).
    pub fn from_midi(midi: u8) -> Result<Self> {
        if midi > 127 {
            return Err(invalid_input!("MIDI pitch must be 0-127, got {}", midi));
        }

        Ok(Note {
            pitch_class: midi % 12,
            octave: (midi / 12) as i8 - 1,
            accidental_preference: AccidentalPreference::Natural,
        })
    }

    /// Get the MIDI pitch number for this note (C4 = 60, A0 = 21).
    pub fn midi(&self) -> i16 {
        (self.octave as i16 + 1) * 12 + self.pitch_class as i16
    }

    /// Get the chromatic pitch class (0-11)
    pub fn pitch_class(&self) -> u8 {
        self.pitch_class
    }

    /// Get the octave (scientific pitch notation, 4 = middle C's octave)
    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// Spell the note as letter + alteration + octave, honoring the
    /// accidental preference (Db rather than C# when flat is preferred).
    pub fn details(&self) -> NoteDetails {
        let (letter, alter) = match self.accidental_preference {
            AccidentalPreference::Flat if !Self::is_natural_note(self.pitch_class) => {
                // Spell from the letter a semitone above
                let upper = (self.pitch_class + 1) % 12;
                (Self::letter_of(upper), -1)
            }
            _ if Self::is_natural_note(self.pitch_class) => {
                (Self::letter_of(self.pitch_class), 0)
            }
            _ => {
                // Default to sharp spelling from the letter a semitone below
                let lower = (self.pitch_class + 11) % 12;
                (Self::letter_of(lower), 1)
            }
        };

        NoteDetails {
            letter,
            alter,
            octave: self.octave,
        }
    }

    /// Check if a pitch class corresponds to a natural note (white key)
    fn is_natural_note(pitch_class: u8) -> bool {
        matches!(pitch_class, 0 | 2 | 4 | 5 | 7 | 9 | 11) // C, D, E, F, G, A, B
    }

    fn letter_of(pitch_class: u8) -> char {
        match pitch_class {
            0 => 'C',
            2 => 'D',
            4 => 'E',
            5 => 'F',
            7 => 'G',
            9 => 'A',
            11 => 'B',
            _ => unreachable!("letter_of called with non-natural pitch class"),
        }
    }

    /// Get the base note name for display purposes
    fn base_note_name(pitch_class: u8) -> &'static str {
        match pitch_class {
            0 => "C",
            2 => "D",
            4 => "E",
            5 => "F",
            7 => "G",
            9 => "A",
            11 => "B",
            _ => "", // Will be handled by accidental logic
        }
    }

    /// Get sharp representation for accidental notes
    fn sharp_name(pitch_class: u8) -> &'static str {
        match pitch_class {
            1 => "C#",
            3 => "D#",
            6 => "F#",
            8 => "G#",
            10 => "A#",
            _ => "",
        }
    }

    /// Get flat representation for accidental notes
    fn flat_name(pitch_class: u8) -> &'static str {
        match pitch_class {
            1 => "Db",
            3 => "Eb",
            6 => "Gb",
            8 => "Ab",
            10 => "Bb",
            _ => "",
        }
    }

    /// Transpose the note by a number of semitones
    pub fn transpose(self, semitones: i8) -> Note {
        let current_semitone_in_octave = self.pitch_class as i32;
        let new_semitone_absolute = current_semitone_in_octave + semitones as i32;

        let octave_shift = new_semitone_absolute.div_euclid(12);
        let new_pitch_class = new_semitone_absolute.rem_euclid(12) as u8;

        // Keep the flat preference across transposition so key-derived
        // spellings survive; everything else normalizes to sharp.
        let new_preference = if Self::is_natural_note(new_pitch_class) {
            AccidentalPreference::Natural
        } else {
            match self.accidental_preference {
                AccidentalPreference::Flat => AccidentalPreference::Flat,
                _ => AccidentalPreference::Sharp,
            }
        };

        Note {
            pitch_class: new_pitch_class,
            octave: self.octave + octave_shift as i8,
            accidental_preference: new_preference,
        }
    }
}

impl FromStr for Note {
    type Err = HarmonyError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_uppercase();

        // Find where the note name ends and possible octave number begins
        // Note name can be 1 or 2 chars (e.g. "C", "F#")
        // Octave can be negative (e.g. "-1")

        let mut note_part_end_idx = 0;
        let mut chars = s.chars().peekable();

        // First char is always part of the note name
        if chars.next().is_some() {
            note_part_end_idx += 1;
        }

        // Check second char (could be accidental or digit/sign)
        if let Some(&c) = chars.peek() {
            if c == '#' || c == 'B' || c == 'S' {
                chars.next();
                note_part_end_idx += 1;
            }
        }

        let note_part = &s[..note_part_end_idx];
        let octave_part = &s[note_part_end_idx..];

        let (pitch_class, accidental_preference) = match note_part {
            // Natural notes
            "C" => (0, AccidentalPreference::Natural),
            "D" => (2, AccidentalPreference::Natural),
            "E" => (4, AccidentalPreference::Natural),
            "F" => (5, AccidentalPreference::Natural),
            "G" => (7, AccidentalPreference::Natural),
            "A" => (9, AccidentalPreference::Natural),
            "B" => (11, AccidentalPreference::Natural),

            // Sharp notes
            "C#" | "CS" => (1, AccidentalPreference::Sharp),
            "D#" | "DS" => (3, AccidentalPreference::Sharp),
            "F#" | "FS" => (6, AccidentalPreference::Sharp),
            "G#" | "GS" => (8, AccidentalPreference::Sharp),
            "A#" | "AS" => (10, AccidentalPreference::Sharp),

            // Flat notes
            "DB" => (1, AccidentalPreference::Flat),
            "EB" => (3, AccidentalPreference::Flat),
            "GB" => (6, AccidentalPreference::Flat),
            "AB" => (8, AccidentalPreference::Flat),
            "BB" => (10, AccidentalPreference::Flat),

            _ => return Err(invalid_input!("Invalid note name: {}", note_part)),
        };

        let octave = if octave_part.is_empty() {
            4
        } else {
            octave_part
                .parse::<i8>()
                .map_err(|_| invalid_input!("Invalid octave: {}", octave_part))?
        };

        Ok(Note {
            pitch_class,
            octave,
            accidental_preference,
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.accidental_preference {
            AccidentalPreference::Flat if !Self::is_natural_note(self.pitch_class) => {
                Self::flat_name(self.pitch_class)
            }
            _ if Self::is_natural_note(self.pitch_class) => {
                Self::base_note_name(self.pitch_class)
            }
            _ => Self::sharp_name(self.pitch_class),
        };

        if name.is_empty() {
            write!(f, "PC{}", self.pitch_class)?;
        } else {
            write!(f, "{}", name)?;
        }

        // Only display octave if it's not 4, for cleaner basic output
        if self.octave != 4 {
            write!(f, "{}", self.octave)
        } else {
            Ok(())
        }
    }
}

// Arithmetic operations for transposition
impl Add<i8> for Note {
    type Output = Note;

    fn add(self, semitones: i8) -> Self::Output {
        self.transpose(semitones)
    }
}

impl Sub<i8> for Note {
    type Output = Note;

    fn sub(self, semitones: i8) -> Self::Output {
        self.transpose(-semitones)
    }
}

// Calculate interval between two notes (ascending, pitch-class space)
impl Sub<Note> for Note {
    type Output = i8;

    fn sub(self, other: Note) -> Self::Output {
        let diff = (self.pitch_class as i8) - (other.pitch_class as i8);
        if diff < 0 { diff + 12 } else { diff }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let c = Note::new(0).unwrap();
        assert_eq!(c.pitch_class(), 0);

        let invalid = Note::new(12);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_note_parsing() {
        let c: Note = "C".parse().unwrap();
        assert_eq!(c.pitch_class(), 0);

        let cs: Note = "C#".parse().unwrap();
        assert_eq!(cs.pitch_class(), 1);

        let db: Note = "Db".parse().unwrap();
        assert_eq!(db.pitch_class(), 1);

        let invalid: Result<Note> = "H".parse();
        assert!(invalid.is_err());
    }

    #[test]
    fn test_midi_roundtrip() {
        let middle_c = Note::from_midi(60).unwrap();
        assert_eq!(middle_c.pitch_class(), 0);
        assert_eq!(middle_c.octave(), 4);
        assert_eq!(middle_c.midi(), 60);

        let a0 = Note::from_midi(21).unwrap();
        assert_eq!(a0.pitch_class(), 9);
        assert_eq!(a0.octave(), 0);

        assert!(Note::from_midi(128).is_err());
    }

    #[test]
    fn test_details_spelling() {
        let cs: Note = "C#3".parse().unwrap();
        let d = cs.details();
        assert_eq!(d.letter, 'C');
        assert_eq!(d.alter, 1);
        assert_eq!(d.octave, 3);

        let db: Note = "Db3".parse().unwrap();
        let d = db.details();
        assert_eq!(d.letter, 'D');
        assert_eq!(d.alter, -1);

        let g: Note = "G5".parse().unwrap();
        let d = g.details();
        assert_eq!(d.letter, 'G');
        assert_eq!(d.alter, 0);
        assert_eq!(d.octave, 5);
    }

    #[test]
    fn test_transposition() {
        let c: Note = "C".parse().unwrap();
        let d = c + 2;
        assert_eq!(d.pitch_class(), 2);

        let bb = c - 2;
        assert_eq!(bb.pitch_class(), 10);

        // Test wrapping
        let b: Note = "B".parse().unwrap();
        let c2 = b + 1;
        assert_eq!(c2.pitch_class(), 0);
        assert_eq!(c2.octave(), 5);
    }

    #[test]
    fn test_interval_calculation() {
        let c: Note = "C".parse().unwrap();
        let e: Note = "E".parse().unwrap();
        assert_eq!(e - c, 4); // Major third

        let g: Note = "G".parse().unwrap();
        assert_eq!(g - c, 7); // Perfect fifth

        // Test descending interval
        assert_eq!(c - g, 5); // Perfect fourth (12 - 7)
    }

    #[test]
    fn test_flat_preference_survives_transpose() {
        let bb: Note = "Bb".parse().unwrap();
        let ab = bb - 2;
        assert_eq!(format!("{}", ab), "Ab");
    }

    #[test]
    fn test_octave_parsing() {
        let c4: Note = "C4".parse().unwrap();
        assert_eq!(c4.pitch_class(), 0);
        assert_eq!(c4.octave(), 4);

        let bb3: Note = "Bb3".parse().unwrap();
        assert_eq!(bb3.pitch_class(), 10);
        assert_eq!(bb3.octave(), 3);

        let g_neg1: Note = "G-1".parse().unwrap();
        assert_eq!(g_neg1.pitch_class(), 7);
        assert_eq!(g_neg1.octave(), -1);
    }
}
