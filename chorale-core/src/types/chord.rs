use crate::error::{theory_error, Result};
use crate::types::note::Note;
use std::fmt;

/// Triad quality, determining the third and fifth above the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordQuality {
    Major,      // [0, 4, 7]
    Minor,      // [0, 3, 7]
    Diminished, // [0, 3, 6]
    Augmented,  // [0, 4, 8]
}

impl ChordQuality {
    /// Semitone offsets of third and fifth above the root.
    pub fn triad_intervals(&self) -> [i8; 2] {
        match self {
            ChordQuality::Major => [4, 7],
            ChordQuality::Minor => [3, 7],
            ChordQuality::Diminished => [3, 6],
            ChordQuality::Augmented => [4, 8],
        }
    }
}

/// The interval quality of an added seventh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeventhKind {
    Major,      // 11 semitones
    Minor,      // 10 semitones
    Diminished, // 9 semitones
}

impl SeventhKind {
    pub fn interval(&self) -> i8 {
        match self {
            SeventhKind::Major => 11,
            SeventhKind::Minor => 10,
            SeventhKind::Diminished => 9,
        }
    }
}

/// A chord factor addressable by figured bass or slash notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordFactor {
    Root,
    Third,
    Fifth,
    Seventh,
}

/// A concrete chord: a root note plus triad quality and optional seventh.
///
/// Unlike an unordered note set, this keeps the chord's factor structure so
/// figured-bass factors (third, fifth, seventh) stay addressable after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    root: Note,
    quality: ChordQuality,
    seventh: Option<SeventhKind>,
}

impl Chord {
    pub fn triad(root: Note, quality: ChordQuality) -> Self {
        Chord {
            root,
            quality,
            seventh: None,
        }
    }

    pub fn seventh_chord(root: Note, quality: ChordQuality, seventh: SeventhKind) -> Self {
        Chord {
            root,
            quality,
            seventh: Some(seventh),
        }
    }

    /// Reassemble a chord from its parts (e.g. after re-rooting).
    pub fn from_parts(root: Note, quality: ChordQuality, seventh: Option<SeventhKind>) -> Self {
        Chord {
            root,
            quality,
            seventh,
        }
    }

    pub fn root(&self) -> Note {
        self.root
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    pub fn seventh(&self) -> Option<SeventhKind> {
        self.seventh
    }

    /// Rebuild the same chord on the same root with a different triad
    /// quality, preserving any seventh.
    pub fn with_quality(self, quality: ChordQuality) -> Self {
        Chord { quality, ..self }
    }

    /// Add a seventh of the given kind.
    pub fn with_seventh(self, seventh: SeventhKind) -> Self {
        Chord {
            seventh: Some(seventh),
            ..self
        }
    }

    /// Semitone offset of a chord factor above the root, if the chord has
    /// that factor (a triad has no seventh).
    pub fn interval_of(&self, factor: ChordFactor) -> Result<i8> {
        let [third, fifth] = self.quality.triad_intervals();
        match factor {
            ChordFactor::Root => Ok(0),
            ChordFactor::Third => Ok(third),
            ChordFactor::Fifth => Ok(fifth),
            ChordFactor::Seventh => self
                .seventh
                .map(|s| s.interval())
                .ok_or_else(|| theory_error!("chord on {} has no seventh", self.root)),
        }
    }

    /// Pitch class of a chord factor.
    pub fn pitch_class_of(&self, factor: ChordFactor) -> Result<u8> {
        let interval = self.interval_of(factor)?;
        Ok((self.root.pitch_class() + interval as u8) % 12)
    }

    /// The chord's notes in root position within one octave, rooted at the
    /// root note's concrete octave.
    pub fn pitches(&self) -> Vec<Note> {
        let [third, fifth] = self.quality.triad_intervals();
        let mut notes = vec![self.root, self.root + third, self.root + fifth];
        if let Some(seventh) = self.seventh {
            notes.push(self.root + seventh.interval());
        }
        notes
    }

    /// The chord's pitch classes, root first.
    pub fn pitch_classes(&self) -> Vec<u8> {
        self.pitches().iter().map(|n| n.pitch_class()).collect()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quality = match self.quality {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
        };
        write!(f, "{}{}", self.root, quality)?;
        match self.seventh {
            Some(SeventhKind::Major) => write!(f, "maj7"),
            Some(SeventhKind::Minor) => write!(f, "7"),
            Some(SeventhKind::Diminished) => write!(f, "dim7"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    #[test]
    fn test_triad_pitch_classes() {
        let c = Chord::triad(note("C"), ChordQuality::Major);
        assert_eq!(c.pitch_classes(), vec![0, 4, 7]);

        let dm = Chord::triad(note("D"), ChordQuality::Minor);
        assert_eq!(dm.pitch_classes(), vec![2, 5, 9]);

        let bdim = Chord::triad(note("B"), ChordQuality::Diminished);
        assert_eq!(bdim.pitch_classes(), vec![11, 2, 5]);
    }

    #[test]
    fn test_seventh_chord() {
        let g7 = Chord::seventh_chord(note("G"), ChordQuality::Major, SeventhKind::Minor);
        assert_eq!(g7.pitch_classes(), vec![7, 11, 2, 5]);
        assert_eq!(g7.pitch_class_of(ChordFactor::Seventh).unwrap(), 5);
    }

    #[test]
    fn test_factor_intervals() {
        let c = Chord::triad(note("C"), ChordQuality::Major);
        assert_eq!(c.interval_of(ChordFactor::Root).unwrap(), 0);
        assert_eq!(c.interval_of(ChordFactor::Third).unwrap(), 4);
        assert_eq!(c.interval_of(ChordFactor::Fifth).unwrap(), 7);
        assert!(c.interval_of(ChordFactor::Seventh).is_err());
    }

    #[test]
    fn test_quality_rebuild() {
        let c = Chord::triad(note("C"), ChordQuality::Major);
        let caug = c.with_quality(ChordQuality::Augmented);
        assert_eq!(caug.pitch_classes(), vec![0, 4, 8]);
    }

    #[test]
    fn test_display() {
        let dm7 = Chord::seventh_chord(note("D"), ChordQuality::Minor, SeventhKind::Minor);
        assert_eq!(format!("{}", dm7), "Dm7");
    }
}
