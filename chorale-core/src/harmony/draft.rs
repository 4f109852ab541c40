//! Progression drafting: plausible roman-numeral progressions on demand.
//!
//! A weighted random walk over a diatonic transition table follows the
//! tonic-predominant-dominant function cycle, always opening on the tonic
//! and closing with an authentic cadence. A small catalogue of named
//! progressions is also available.

use crate::error::{invalid_input, Result};
use crate::types::chord::ChordQuality;
use crate::types::key::Key;
use rand::Rng;

/// Row-stochastic transition weights between scale degrees (row = from,
/// column = to). Encodes common-practice motion: predominants drive to the
/// dominant, the dominant resolves home or deceptively to vi.
const TRANSITIONS: [[u32; 7]; 7] = [
    // to:  I  ii iii IV  V  vi vii
    [0, 4, 2, 5, 5, 3, 1], // from I
    [0, 1, 0, 1, 6, 1, 2], // from ii
    [1, 2, 0, 3, 1, 3, 0], // from iii
    [2, 3, 0, 1, 5, 1, 2], // from IV
    [5, 0, 1, 1, 1, 3, 0], // from V
    [1, 4, 1, 3, 2, 0, 0], // from vi
    [6, 0, 1, 0, 1, 1, 0], // from vii
];

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Render a scale degree as a roman token with case and quality marks
/// matching the key's diatonic triad.
fn render_token(key: &Key, degree: usize, seventh: bool) -> String {
    let quality = key
        .diatonic_triad(degree)
        .map(|c| c.quality())
        .unwrap_or(ChordQuality::Major);

    let mut token = match quality {
        ChordQuality::Major | ChordQuality::Augmented => NUMERALS[degree].to_string(),
        ChordQuality::Minor => NUMERALS[degree].to_lowercase(),
        ChordQuality::Diminished => format!("{}°", NUMERALS[degree].to_lowercase()),
    };
    if seventh {
        token.push('7');
    }
    token
}

fn weighted_degree(weights: &[u32; 7], rng: &mut impl Rng) -> usize {
    let total: u32 = weights.iter().sum();
    let mut roll = rng.gen_range(0..total);
    for (degree, &weight) in weights.iter().enumerate() {
        if roll < weight {
            return degree;
        }
        roll -= weight;
    }
    0
}

/// Draft a progression of `length` roman tokens in the key.
///
/// Opens on the tonic and closes V(7) -> I; for lengths under three the
/// cadence wins over the tonic opening. Deterministic under a fixed rng.
pub fn draft_progression(key: &Key, length: usize, rng: &mut impl Rng) -> Result<Vec<String>> {
    if length == 0 {
        return Err(invalid_input!("Progression length must be at least 1"));
    }

    let mut degrees = vec![0usize];
    while degrees.len() < length {
        let current = *degrees.last().expect("progression starts non-empty");
        degrees.push(weighted_degree(&TRANSITIONS[current], rng));
    }

    // Authentic cadence on the tail
    if length >= 2 {
        degrees[length - 2] = 4;
        degrees[length - 1] = 0;
    }

    let tokens = degrees
        .iter()
        .map(|&degree| {
            // Dominants occasionally carry their seventh
            let seventh = degree == 4 && rng.gen_range(0..3) == 0;
            render_token(key, degree, seventh)
        })
        .collect();

    Ok(tokens)
}

/// Draft with a self-contained generator; the whole draft is reproducible
/// from the seed.
pub fn draft_progression_seeded(key: &Key, length: usize, seed: u64) -> Result<Vec<String>> {
    use rand::SeedableRng;
    let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
    draft_progression(key, length, &mut rng)
}

/// Look up a named progression rendered for the key. Returns None for an
/// unknown name.
pub fn named_progression(name: &str, key: &Key) -> Option<Vec<String>> {
    // (degree, wants seventh)
    let shape: &[(usize, bool)] = match name.to_ascii_lowercase().as_str() {
        "pop" | "axis" => &[(0, false), (4, false), (5, false), (3, false)],
        "pachelbel" | "canon" => &[
            (0, false),
            (4, false),
            (5, false),
            (2, false),
            (3, false),
            (0, false),
            (3, false),
            (4, false),
        ],
        "cadence" | "authentic" => &[(0, false), (3, false), (4, false), (0, false)],
        "jazz" | "251" => &[(1, true), (4, true), (0, false)],
        "circle" => &[(0, false), (5, false), (1, false), (4, false)],
        "blues" | "12bar" => &[
            (0, false),
            (0, false),
            (0, false),
            (0, true),
            (3, false),
            (3, false),
            (0, false),
            (0, false),
            (4, true),
            (3, false),
            (0, false),
            (4, true),
        ],
        _ => return None,
    };

    Some(
        shape
            .iter()
            .map(|&(degree, seventh)| render_token(key, degree, seventh))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::roman::RomanNumeral;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_draft_shape() {
        let key: Key = "C".parse().unwrap();
        let mut rng = Pcg32::seed_from_u64(9);

        for length in [4usize, 8, 12] {
            let tokens = draft_progression(&key, length, &mut rng).unwrap();
            assert_eq!(tokens.len(), length);
            assert_eq!(tokens[0], "I");
            assert!(tokens[length - 2].starts_with('V'));
            assert_eq!(tokens[length - 1], "I");
        }
    }

    #[test]
    fn test_drafted_tokens_all_parse() {
        for key_str in ["C", "F#", "Am", "Bbm"] {
            let key: Key = key_str.parse().unwrap();
            let mut rng = Pcg32::seed_from_u64(4);
            let tokens = draft_progression(&key, 16, &mut rng).unwrap();
            for token in &tokens {
                assert!(
                    token.parse::<RomanNumeral>().is_ok(),
                    "token {} from key {} does not parse",
                    token,
                    key_str
                );
            }
        }
    }

    #[test]
    fn test_draft_is_deterministic() {
        let key: Key = "G".parse().unwrap();
        let a = draft_progression(&key, 8, &mut Pcg32::seed_from_u64(21)).unwrap();
        let b = draft_progression(&key, 8, &mut Pcg32::seed_from_u64(21)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_minor_key_rendering() {
        let key: Key = "Am".parse().unwrap();
        let mut rng = Pcg32::seed_from_u64(2);
        let tokens = draft_progression(&key, 8, &mut rng).unwrap();

        // Minor tonic renders lowercase, and the harmonic-minor dominant
        // stays uppercase
        assert_eq!(tokens[0], "i");
        assert!(tokens[6].starts_with('V'));
    }

    #[test]
    fn test_named_progressions() {
        let key: Key = "C".parse().unwrap();

        let pop = named_progression("pop", &key).unwrap();
        assert_eq!(pop, vec!["I", "V", "vi", "IV"]);

        let jazz = named_progression("jazz", &key).unwrap();
        assert_eq!(jazz, vec!["ii7", "V7", "I"]);

        assert_eq!(named_progression("blues", &key).unwrap().len(), 12);
        assert!(named_progression("nope", &key).is_none());
    }

    #[test]
    fn test_named_progression_in_minor() {
        let key: Key = "Am".parse().unwrap();
        let pop = named_progression("pop", &key).unwrap();
        // i V VI iv in minor
        assert_eq!(pop, vec!["i", "V", "VI", "iv"]);
    }

    #[test]
    fn test_zero_length_is_invalid() {
        let key: Key = "C".parse().unwrap();
        assert!(draft_progression(&key, 0, &mut Pcg32::seed_from_u64(0)).is_err());
    }
}
