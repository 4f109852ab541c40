//! Roman-numeral resolution: token + key to concrete pitches.

use crate::error::Result;
use crate::harmony::roman::{QualityOverride, RomanNumeral, SeventhMarker};
use crate::types::chord::{Chord, ChordFactor, ChordQuality, SeventhKind};
use crate::types::key::Key;
use crate::types::note::Note;

/// A chord resolved against a key: concrete root-position pitches plus the
/// pitch class that must sound in the bass when the chord is inverted.
///
/// Invariant: `required_bass_pc`, when present, is one of the chord's own
/// pitch classes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChord {
    pub chord: Chord,
    /// Root position, one octave, in register (see root octave guess).
    pub pitches: Vec<Note>,
    /// Forced bass pitch class for inversions; None in root position.
    pub required_bass_pc: Option<u8>,
}

impl ResolvedChord {
    pub fn root_pc(&self) -> u8 {
        self.chord.root().pitch_class()
    }

    pub fn pitch_classes(&self) -> Vec<u8> {
        self.chord.pitch_classes()
    }

    /// The pitch class the bass should prefer: the forced one, or the root.
    pub fn bass_pc(&self) -> u8 {
        self.required_bass_pc.unwrap_or_else(|| self.root_pc())
    }
}

/// Natural seventh extension of a triad quality, used when an explicit
/// quality override detaches the chord from the key's per-degree table.
fn natural_seventh(quality: ChordQuality) -> SeventhKind {
    match quality {
        ChordQuality::Major => SeventhKind::Major,
        ChordQuality::Minor => SeventhKind::Minor,
        ChordQuality::Diminished => SeventhKind::Minor, // half-diminished
        ChordQuality::Augmented => SeventhKind::Major,
    }
}

/// Pick the register for the chord root: octave 3, dropped to 2 for letters
/// F-B (keeping stacked thirds near the staff break), then nudged one
/// octave back inside the 36-72 keyboard window if the guess left it.
fn place_root(root: Note) -> Note {
    let target_octave: i8 = if matches!(root.details().letter, 'F' | 'G' | 'A' | 'B') {
        2
    } else {
        3
    };

    let mut placed = root.transpose((target_octave - root.octave()) * 12);
    if placed.midi() < 36 {
        placed = placed + 12;
    } else if placed.midi() > 72 {
        placed = placed - 12;
    }
    placed
}

/// Resolve a parsed roman numeral against a key.
///
/// Follows the diatonic triad for the written degree, applies any explicit
/// quality override on the same root, then adds the requested seventh: an
/// explicit half/fully-diminished marker wins, otherwise the key's
/// per-degree default, otherwise the triad's natural extension.
pub fn resolve(numeral: &RomanNumeral, key: &Key) -> Result<ResolvedChord> {
    let diatonic = key.diatonic_triad(numeral.degree.index())?;

    let chord = match numeral.quality {
        Some(QualityOverride::Major) => diatonic.with_quality(ChordQuality::Major),
        Some(QualityOverride::Minor) => diatonic.with_quality(ChordQuality::Minor),
        Some(QualityOverride::Diminished) => diatonic.with_quality(ChordQuality::Diminished),
        Some(QualityOverride::Augmented) => diatonic.with_quality(ChordQuality::Augmented),
        None => diatonic,
    };

    let chord = match numeral.seventh {
        None => chord,
        Some(SeventhMarker::HalfDiminished) => chord.with_seventh(SeventhKind::Minor),
        Some(SeventhMarker::FullyDiminished) => chord.with_seventh(SeventhKind::Diminished),
        Some(SeventhMarker::Default) => {
            let kind = if numeral.quality.is_some() {
                natural_seventh(chord.quality())
            } else {
                key.default_seventh(numeral.degree.index())?
            };
            chord.with_seventh(kind)
        }
    };

    // Re-root into playing register and expand to concrete pitches
    let placed = Chord::from_parts(place_root(chord.root()), chord.quality(), chord.seventh());
    let pitches = placed.pitches();

    let required_bass_pc = match numeral.bass {
        ChordFactor::Root => None,
        factor => Some(placed.pitch_class_of(factor)?),
    };

    Ok(ResolvedChord {
        chord: placed,
        pitches,
        required_bass_pc,
    })
}
