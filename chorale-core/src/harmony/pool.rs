//! Candidate pitch pool construction.

use crate::types::note::Note;

/// Lowest piano key (A0).
pub const POOL_MIN: i16 = 21;
/// Highest piano key (C8).
pub const POOL_MAX: i16 = 108;

/// Octave span replicated around the chord's register: two octaves down,
/// four up.
const OCTAVES_DOWN: i16 = 2;
const OCTAVES_UP: i16 = 4;

/// Expand a one-octave chord pitch set into the multi-octave candidate pool
/// the voice assigners draw from: every chord pitch class replicated across
/// the octave span, deduplicated, sorted ascending, and clipped to the
/// instrument-safe window. Pure function.
pub fn build_pitch_pool(pitches: &[Note]) -> Vec<u8> {
    let mut pool: Vec<u8> = Vec::new();

    for note in pitches {
        let base = note.midi();
        for octave in -OCTAVES_DOWN..=OCTAVES_UP {
            let midi = base + octave * 12;
            if (POOL_MIN..=POOL_MAX).contains(&midi) {
                pool.push(midi as u8);
            }
        }
    }

    pool.sort_unstable();
    pool.dedup();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::resolve::resolve;
    use crate::types::key::Key;

    #[test]
    fn test_pool_is_sorted_and_clipped() {
        let c4: Note = "C4".parse().unwrap();
        let e4: Note = "E4".parse().unwrap();
        let g4: Note = "G4".parse().unwrap();

        let pool = build_pitch_pool(&[c4, e4, g4]);
        assert!(pool.windows(2).all(|w| w[0] < w[1]));
        assert!(pool.iter().all(|&p| (21..=108).contains(&p)));
        assert!(!pool.is_empty());
    }

    #[test]
    fn test_pool_is_superset_of_chord_tones() {
        // Round-trip property: resolving a numeral and building its pool
        // keeps every base chord pitch class present across octaves
        let key: Key = "C".parse().unwrap();
        for token in ["I", "ii6", "V7", "vii°"] {
            let r = resolve(&token.parse().unwrap(), &key).unwrap();
            let pool = build_pitch_pool(&r.pitches);
            for pc in r.pitch_classes() {
                assert!(
                    pool.iter().any(|&p| p % 12 == pc),
                    "pc {} missing from pool for {}",
                    pc,
                    token
                );
            }
        }
    }

    #[test]
    fn test_pool_covers_bass_and_soprano_registers() {
        let c3: Note = "C3".parse().unwrap();
        let e3: Note = "E3".parse().unwrap();
        let g3: Note = "G3".parse().unwrap();

        let pool = build_pitch_pool(&[c3, e3, g3]);
        // Two octaves below C3 (midi 48) is C1 (24); four above is C7 (96)
        assert!(pool.contains(&24));
        assert!(pool.contains(&96));
        assert!(!pool.contains(&108)); // no chord tone lands there
    }
}
