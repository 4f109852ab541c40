use crate::error::{invalid_input, HarmonyError, Result};
use crate::types::chord::{Chord, ChordQuality, SeventhKind};
use crate::types::note::Note;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Major,
    Minor,
}

/// A key: tonic pitch plus major/minor mode.
///
/// Scale-degree queries use the harmonic-minor variant for the dominant and
/// leading-tone degrees in minor keys, so V is a major triad and vii° sits
/// on the raised seventh. A valid key always yields exactly 7 diatonic
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    tonic: Note,
    mode: Mode,
}

/// Semitone offsets of the major scale degrees.
const MAJOR_SCALE: [i8; 7] = [0, 2, 4, 5, 7, 9, 11];
/// Natural minor, except degrees V and vii which are harmonic (see below).
const MINOR_SCALE: [i8; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Diatonic triad qualities per degree.
const MAJOR_TRIADS: [ChordQuality; 7] = [
    ChordQuality::Major,      // I
    ChordQuality::Minor,      // ii
    ChordQuality::Minor,      // iii
    ChordQuality::Major,      // IV
    ChordQuality::Major,      // V
    ChordQuality::Minor,      // vi
    ChordQuality::Diminished, // vii°
];
const MINOR_TRIADS: [ChordQuality; 7] = [
    ChordQuality::Minor,      // i
    ChordQuality::Diminished, // ii°
    ChordQuality::Major,      // III
    ChordQuality::Minor,      // iv
    ChordQuality::Major,      // V (harmonic minor)
    ChordQuality::Major,      // VI
    ChordQuality::Diminished, // vii° (on the raised seventh)
];

/// Default seventh quality when a bare "7" is requested on a diatonic degree.
const MAJOR_SEVENTHS: [SeventhKind; 7] = [
    SeventhKind::Major, // IM7
    SeventhKind::Minor, // ii7
    SeventhKind::Minor, // iii7
    SeventhKind::Major, // IVM7
    SeventhKind::Minor, // V7 (dominant)
    SeventhKind::Minor, // vi7
    SeventhKind::Minor, // viiø7
];
const MINOR_SEVENTHS: [SeventhKind; 7] = [
    SeventhKind::Minor,      // i7
    SeventhKind::Minor,      // iiø7
    SeventhKind::Major,      // IIIM7
    SeventhKind::Minor,      // iv7
    SeventhKind::Minor,      // V7 (dominant, harmonic minor)
    SeventhKind::Major,      // VIM7
    SeventhKind::Diminished, // vii°7 (fully diminished)
];

impl Key {
    pub fn new(tonic: Note, mode: Mode) -> Self {
        Key { tonic, mode }
    }

    pub fn tonic(&self) -> Note {
        self.tonic
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Semitone offset of a scale degree (0-6) above the tonic.
    ///
    /// Minor keys answer with the harmonic-minor leading tone for the
    /// seventh degree, matching the triads built on V and vii.
    pub fn degree_offset(&self, degree: usize) -> Result<i8> {
        if degree > 6 {
            return Err(invalid_input!("Scale degree must be 0-6, got {}", degree));
        }
        Ok(match self.mode {
            Mode::Major => MAJOR_SCALE[degree],
            Mode::Minor if degree == 6 => 11, // raised seventh
            Mode::Minor => MINOR_SCALE[degree],
        })
    }

    /// The seven scale pitch classes, tonic first.
    pub fn scale_pitch_classes(&self) -> [u8; 7] {
        let mut pcs = [0u8; 7];
        for (i, pc) in pcs.iter_mut().enumerate() {
            let offset = self.degree_offset(i).expect("degree 0-6 is always valid");
            *pc = (self.tonic.pitch_class() + offset as u8) % 12;
        }
        pcs
    }

    /// Pitch class of the leading tone (major seventh above the tonic).
    /// Doubling it in a voicing is avoided regardless of mode.
    pub fn leading_tone_pc(&self) -> u8 {
        (self.tonic.pitch_class() + 11) % 12
    }

    /// The diatonic triad on a scale degree (0-6), rooted at octave 4.
    pub fn diatonic_triad(&self, degree: usize) -> Result<Chord> {
        let offset = self.degree_offset(degree)?;
        let root = self.tonic + offset;
        let quality = match self.mode {
            Mode::Major => MAJOR_TRIADS[degree],
            Mode::Minor => MINOR_TRIADS[degree],
        };
        Ok(Chord::triad(root, quality))
    }

    /// Default seventh kind for a bare "7" marker on a scale degree.
    pub fn default_seventh(&self, degree: usize) -> Result<SeventhKind> {
        if degree > 6 {
            return Err(invalid_input!("Scale degree must be 0-6, got {}", degree));
        }
        Ok(match self.mode {
            Mode::Major => MAJOR_SEVENTHS[degree],
            Mode::Minor => MINOR_SEVENTHS[degree],
        })
    }
}

impl FromStr for Key {
    type Err = HarmonyError;

    /// Parse key strings like "C", "Gm", "F#m", "Bb".
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(invalid_input!("Empty key string"));
        }

        // A trailing lowercase 'm' marks minor; everything before it is the
        // tonic note name. "Bb" keeps its 'b' because flats parse as part
        // of the note.
        let (note_part, mode) = match s.strip_suffix('m') {
            Some(rest) if !rest.is_empty() => (rest, Mode::Minor),
            _ => (s, Mode::Major),
        };

        let tonic: Note = note_part
            .parse()
            .map_err(|_| invalid_input!("Invalid key: {}", s))?;

        Ok(Key { tonic, mode })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Major => write!(f, "{}", self.tonic),
            Mode::Minor => write!(f, "{}m", self.tonic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        let c: Key = "C".parse().unwrap();
        assert_eq!(c.tonic().pitch_class(), 0);
        assert_eq!(c.mode(), Mode::Major);

        let gm: Key = "Gm".parse().unwrap();
        assert_eq!(gm.tonic().pitch_class(), 7);
        assert_eq!(gm.mode(), Mode::Minor);

        let fs_minor: Key = "F#m".parse().unwrap();
        assert_eq!(fs_minor.tonic().pitch_class(), 6);
        assert_eq!(fs_minor.mode(), Mode::Minor);

        let bb: Key = "Bb".parse().unwrap();
        assert_eq!(bb.tonic().pitch_class(), 10);
        assert_eq!(bb.mode(), Mode::Major);

        assert!("".parse::<Key>().is_err());
        assert!("H".parse::<Key>().is_err());
    }

    #[test]
    fn test_major_scale() {
        let c: Key = "C".parse().unwrap();
        assert_eq!(c.scale_pitch_classes(), [0, 2, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn test_minor_scale_has_leading_tone() {
        // A minor: harmonic-minor seventh degree is G#
        let am: Key = "Am".parse().unwrap();
        assert_eq!(am.scale_pitch_classes(), [9, 11, 0, 2, 4, 5, 8]);
    }

    #[test]
    fn test_diatonic_triads_major() {
        let c: Key = "C".parse().unwrap();

        let tonic = c.diatonic_triad(0).unwrap();
        assert_eq!(tonic.pitch_classes(), vec![0, 4, 7]);

        let supertonic = c.diatonic_triad(1).unwrap();
        assert_eq!(supertonic.quality(), ChordQuality::Minor);
        assert_eq!(supertonic.pitch_classes(), vec![2, 5, 9]);

        let leading = c.diatonic_triad(6).unwrap();
        assert_eq!(leading.quality(), ChordQuality::Diminished);

        assert!(c.diatonic_triad(7).is_err());
    }

    #[test]
    fn test_harmonic_minor_dominant() {
        // In A minor the dominant is E major (G# from harmonic minor)
        let am: Key = "Am".parse().unwrap();
        let v = am.diatonic_triad(4).unwrap();
        assert_eq!(v.quality(), ChordQuality::Major);
        assert_eq!(v.pitch_classes(), vec![4, 8, 11]);

        // And the leading-tone triad sits on G#, not G
        let vii = am.diatonic_triad(6).unwrap();
        assert_eq!(vii.root().pitch_class(), 8);
        assert_eq!(vii.quality(), ChordQuality::Diminished);
    }

    #[test]
    fn test_default_sevenths() {
        let c: Key = "C".parse().unwrap();
        assert_eq!(c.default_seventh(4).unwrap(), SeventhKind::Minor); // V7
        assert_eq!(c.default_seventh(0).unwrap(), SeventhKind::Major); // IM7

        let am: Key = "Am".parse().unwrap();
        assert_eq!(am.default_seventh(6).unwrap(), SeventhKind::Diminished); // vii°7
    }

    #[test]
    fn test_leading_tone() {
        let c: Key = "C".parse().unwrap();
        assert_eq!(c.leading_tone_pc(), 11);

        let am: Key = "Am".parse().unwrap();
        assert_eq!(am.leading_tone_pc(), 8); // G#
    }
}
