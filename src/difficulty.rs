//! Difficulty-to-settings mapping.
//!
//! One 0-10 scalar spreads onto the full settings record: easier pieces
//! get smoother lines, stricter checking, and simpler rhythms; the top
//! tiers switch to melody-plus-accompaniment texture.

use chorale_core::{GenerationSettings, GenerationStyle};

/// Settings for a difficulty scalar. Input above 10 clamps to 10.
pub fn settings_for_difficulty(difficulty: u8) -> GenerationSettings {
    // (smoothness, strictness, complexity, style, accompaniment voices)
    let (smoothness, strictness, complexity, style, voices) = match difficulty.min(10) {
        0 => (9, 8, 1, GenerationStyle::Satb, 3),
        1 => (9, 8, 2, GenerationStyle::Satb, 3),
        2 => (8, 7, 3, GenerationStyle::Satb, 3),
        3 => (8, 7, 4, GenerationStyle::Satb, 3),
        4 => (7, 6, 5, GenerationStyle::Satb, 3),
        5 => (6, 6, 5, GenerationStyle::Satb, 3),
        6 => (6, 5, 6, GenerationStyle::Satb, 3),
        7 => (5, 5, 7, GenerationStyle::Satb, 3),
        8 => (4, 4, 8, GenerationStyle::MelodyAccompaniment, 3),
        9 => (3, 3, 9, GenerationStyle::MelodyAccompaniment, 3),
        _ => (2, 2, 10, GenerationStyle::MelodyAccompaniment, 4),
    };

    GenerationSettings {
        melodic_smoothness: smoothness,
        dissonance_strictness: strictness,
        rhythmic_complexity: complexity,
        style,
        num_accompaniment_voices: voices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_progression() {
        for d in 0..10u8 {
            let lower = settings_for_difficulty(d);
            let higher = settings_for_difficulty(d + 1);
            assert!(higher.melodic_smoothness <= lower.melodic_smoothness);
            assert!(higher.rhythmic_complexity >= lower.rhythmic_complexity);
        }
    }

    #[test]
    fn test_style_flips_at_top_tiers() {
        assert_eq!(settings_for_difficulty(7).style, GenerationStyle::Satb);
        assert_eq!(
            settings_for_difficulty(8).style,
            GenerationStyle::MelodyAccompaniment
        );
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(settings_for_difficulty(99), settings_for_difficulty(10));
    }

    #[test]
    fn test_all_tiers_are_valid_settings() {
        for d in 0..=10u8 {
            let settings = settings_for_difficulty(d);
            assert!(chorale_core::Harmonizer::new(settings).is_ok());
        }
    }
}
