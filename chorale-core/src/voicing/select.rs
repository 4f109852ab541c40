//! The "closest note" selector shared by every voice assigner.
//!
//! Scores each candidate by distance to the target pitch, weighted by how
//! the voice would move from its previous pitch. A post-pass trades a wide
//! leap back for a stepwise candidate when the step is nearly as close to
//! the target.

/// Tunable selector thresholds. The defaults preserve the qualitative
/// behavior (steps beat leaps unless they cost much target accuracy); the
/// exact values are configuration, not a correctness contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorConfig {
    /// Motion beyond this many semitones counts as a wide leap.
    pub leap_threshold: u8,
    /// Score factor for staying on the same pitch.
    pub unison_factor: f64,
    /// Score factor for stepwise motion (up to 2 semitones).
    pub step_factor: f64,
    /// Per-semitone cost growth for moderate leaps, scaled by smoothness.
    pub leap_cost: f64,
    /// Base factor for leaps beyond the threshold.
    pub wide_leap_factor: f64,
    /// Per-semitone cost growth beyond the threshold. Kept mild: the
    /// step-override pass, not the base score, is where smoothness
    /// penalizes wide leaps.
    pub wide_leap_cost: f64,
    /// Base allowance for the step-override pass: a step replaces a wide
    /// leap when its target distance is within this multiple.
    pub step_override_base: f64,
    /// Additional override allowance per smoothness point.
    pub step_override_per_smoothness: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            leap_threshold: 7, // a perfect fifth
            unison_factor: 0.5,
            step_factor: 0.75,
            leap_cost: 0.04,
            wide_leap_factor: 1.3,
            wide_leap_cost: 0.02,
            step_override_base: 1.25,
            step_override_per_smoothness: 0.15,
        }
    }
}

fn motion_factor(interval: u8, smoothness: u8, cfg: &SelectorConfig) -> f64 {
    let smoothness_scale = 1.0 + smoothness as f64 / 10.0;
    match interval {
        0 => cfg.unison_factor,
        1 | 2 => cfg.step_factor,
        i if i <= cfg.leap_threshold => 1.0 + i as f64 * cfg.leap_cost * smoothness_scale,
        i => cfg.wide_leap_factor + i as f64 * cfg.wide_leap_cost,
    }
}

/// Pick the best next pitch for one voice.
///
/// `candidates` must be sorted ascending. Returns None only for an empty
/// candidate list.
pub fn closest_note(
    target: u8,
    candidates: &[u8],
    previous: Option<u8>,
    smoothness: u8,
    cfg: &SelectorConfig,
) -> Option<u8> {
    match candidates {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    let score = |candidate: u8| -> f64 {
        let base = (candidate as i16 - target as i16).abs() as f64;
        match previous {
            Some(prev) => {
                let interval = (candidate as i16 - prev as i16).unsigned_abs() as u8;
                base * motion_factor(interval, smoothness, cfg)
            }
            None => base,
        }
    };

    let mut chosen = candidates[0];
    let mut best = score(chosen);
    for &candidate in &candidates[1..] {
        let s = score(candidate);
        if s < best {
            best = s;
            chosen = candidate;
        }
    }

    // Step-override pass: a wide leap yields to a stepwise candidate whose
    // target distance is not drastically worse
    if let Some(prev) = previous {
        let leap = (chosen as i16 - prev as i16).unsigned_abs();
        if leap > cfg.leap_threshold as u16 {
            let allowance =
                cfg.step_override_base + smoothness as f64 * cfg.step_override_per_smoothness;
            let chosen_distance = (chosen as i16 - target as i16).abs() as f64;

            let best_step = candidates
                .iter()
                .copied()
                .filter(|&c| (c as i16 - prev as i16).unsigned_abs() <= 2)
                .min_by_key(|&c| (c as i16 - target as i16).abs());

            if let Some(step) = best_step {
                let step_distance = (step as i16 - target as i16).abs() as f64;
                if step_distance <= chosen_distance * allowance {
                    return Some(step);
                }
            }
        }
    }

    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SelectorConfig {
        SelectorConfig::default()
    }

    #[test]
    fn test_trivial_cases() {
        assert_eq!(closest_note(60, &[], None, 5, &cfg()), None);
        assert_eq!(closest_note(60, &[53], None, 5, &cfg()), Some(53));
    }

    #[test]
    fn test_picks_nearest_without_previous() {
        let candidates = [48, 55, 60, 64, 67, 72];
        assert_eq!(closest_note(62, &candidates, None, 5, &cfg()), Some(60));
        assert_eq!(closest_note(66, &candidates, None, 5, &cfg()), Some(67));
    }

    #[test]
    fn test_prefers_common_tone() {
        // 64 is on-target and the voice already sits there: unison wins
        let candidates = [60, 64, 67];
        assert_eq!(closest_note(64, &candidates, Some(64), 5, &cfg()), Some(64));
    }

    #[test]
    fn test_step_override_scales_with_smoothness() {
        // From 60, candidate 68 is a wide leap close to the target and 62
        // is a step far from it. High smoothness reclaims the step; low
        // smoothness keeps the accurate leap.
        let candidates = [62, 68];
        assert_eq!(closest_note(72, &candidates, Some(60), 10, &cfg()), Some(62));
        assert_eq!(closest_note(72, &candidates, Some(60), 0, &cfg()), Some(68));
    }

    #[test]
    fn test_wide_leap_survives_when_step_is_far() {
        // The stepwise option is nearly two octaves off target; the exact
        // leap stays even at high smoothness
        let candidates = [50, 72];
        assert_eq!(closest_note(72, &candidates, Some(49), 9, &cfg()), Some(72));
    }

    #[test]
    fn test_smoothness_zero_still_picks_minimum() {
        let candidates = [55, 59, 62];
        assert_eq!(closest_note(60, &candidates, Some(57), 0, &cfg()), Some(59));
    }
}
