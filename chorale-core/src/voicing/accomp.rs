//! Melody plus block-chord accompaniment assignment.
//!
//! One melody voice is placed like a soprano in a wider range, then a
//! small accompaniment chord is stacked strictly below it, lowest voice
//! first, preferring still-uncovered chord pitch classes on the way up.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Location, VoiceId};
use crate::harmony::resolve::ResolvedChord;
use crate::voicing::select::{closest_note, SelectorConfig};
use crate::voicing::{Voicing, ACCOMP_RANGE, MELODY_RANGE, SPACING_MELODY_ACCOMP};

/// Assign the melody and `num_voices` accompaniment voices for one event.
pub fn assign_melody_accompaniment(
    resolved: &ResolvedChord,
    pool: &[u8],
    previous: Option<&Voicing>,
    num_voices: u8,
    smoothness: u8,
    cfg: &SelectorConfig,
    location: Location,
    diagnostics: &mut Vec<Diagnostic>,
) -> Voicing {
    let prev = |id: VoiceId| previous.and_then(|v| v.get(id));

    // --- Melody -------------------------------------------------------
    let melody_candidates: Vec<u8> = pool
        .iter()
        .copied()
        .filter(|&p| MELODY_RANGE.contains(p))
        .collect();

    let melody_target = prev(VoiceId::Melody)
        .map(|p| p.saturating_add(2).min(MELODY_RANGE.max))
        .unwrap_or_else(|| MELODY_RANGE.center());

    let melody = closest_note(
        melody_target,
        &melody_candidates,
        prev(VoiceId::Melody),
        smoothness,
        cfg,
    );
    if melody.is_none() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::VoicingIncomplete { voice: VoiceId::Melody },
            location,
        ));
    }

    // --- Accompaniment, lowest voice first ----------------------------
    let mut covered: Vec<u8> = melody.map(|p| p % 12).into_iter().collect();
    let chord_pcs = resolved.pitch_classes();

    let mut accomp: Vec<Option<u8>> = Vec::with_capacity(num_voices as usize);
    let mut floor: Option<u8> = None; // the previously placed (lower) voice

    for index in 0..num_voices {
        let id = VoiceId::Accompaniment(index);
        let is_top = index + 1 == num_voices;

        let candidates: Vec<u8> = pool
            .iter()
            .copied()
            .filter(|&p| ACCOMP_RANGE.contains(p))
            .filter(|&p| melody.map_or(true, |m| p < m))
            .filter(|&p| floor.map_or(true, |f| p > f))
            .filter(|&p| {
                // The top accompaniment voice stays within the ceiling of
                // the melody
                !is_top || melody.map_or(true, |m| m as i16 - p as i16 <= SPACING_MELODY_ACCOMP)
            })
            .collect();

        if candidates.is_empty() {
            // Pool exhausted below the melody: pad the remaining voices
            accomp.push(None);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::VoicingIncomplete { voice: id },
                location,
            ));
            continue;
        }

        // The lowest voice anchors on the chord root low in the range;
        // upper voices fill in whatever the texture still lacks
        let preferred_pc: Vec<u8> = if index == 0 {
            vec![resolved.bass_pc()]
        } else {
            chord_pcs
                .iter()
                .copied()
                .filter(|pc| !covered.contains(pc))
                .collect()
        };

        let target = prev(id).unwrap_or_else(|| match floor {
            Some(f) => ACCOMP_RANGE.clamp(f as i16 + 4),
            None => ACCOMP_RANGE.clamp(ACCOMP_RANGE.min as i16 + 7),
        });

        let on_pc: Vec<u8> = candidates
            .iter()
            .copied()
            .filter(|&p| preferred_pc.contains(&(p % 12)))
            .collect();

        let pitch = if on_pc.is_empty() {
            closest_note(target, &candidates, prev(id), smoothness, cfg)
        } else {
            closest_note(target, &on_pc, prev(id), smoothness, cfg)
        };

        if let Some(p) = pitch {
            covered.push(p % 12);
            floor = Some(p);
        }
        accomp.push(pitch);
    }

    let mut voices: Vec<(VoiceId, Option<u8>)> = accomp
        .into_iter()
        .enumerate()
        .map(|(i, p)| (VoiceId::Accompaniment(i as u8), p))
        .collect();
    voices.push((VoiceId::Melody, melody));

    Voicing::new(voices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::pool::build_pitch_pool;
    use crate::harmony::resolve::resolve;
    use crate::types::key::Key;
    use crate::types::time::time;

    fn loc() -> Location {
        Location {
            measure: 0,
            beat: time(1, 1),
        }
    }

    fn voice_event(token: &str, key_str: &str, previous: Option<&Voicing>) -> (Voicing, Vec<Diagnostic>) {
        let key: Key = key_str.parse().unwrap();
        let resolved = resolve(&token.parse().unwrap(), &key).unwrap();
        let pool = build_pitch_pool(&resolved.pitches);
        let mut diags = Vec::new();
        let voicing = assign_melody_accompaniment(
            &resolved,
            &pool,
            previous,
            3,
            5,
            &SelectorConfig::default(),
            loc(),
            &mut diags,
        );
        (voicing, diags)
    }

    #[test]
    fn test_accompaniment_sits_below_melody() {
        let (v, _) = voice_event("I", "C", None);
        let melody = v.get(VoiceId::Melody).unwrap();

        let mut last = 0u8;
        for i in 0..3 {
            let p = v.get(VoiceId::Accompaniment(i)).unwrap();
            assert!(p < melody, "accompaniment voice {} above melody", i);
            assert!(p > last, "accompaniment voices not ascending");
            last = p;
        }
    }

    #[test]
    fn test_lowest_voice_anchors_root() {
        let (v, _) = voice_event("I", "C", None);
        assert_eq!(v.get(VoiceId::Accompaniment(0)).unwrap() % 12, 0);
    }

    #[test]
    fn test_inversion_anchors_required_bass() {
        let (v, _) = voice_event("ii6", "C", None);
        assert_eq!(v.get(VoiceId::Accompaniment(0)).unwrap() % 12, 5);
    }

    #[test]
    fn test_top_voice_within_ceiling() {
        let (v, _) = voice_event("V7", "C", None);
        let melody = v.get(VoiceId::Melody).unwrap();
        let top = v.get(VoiceId::Accompaniment(2)).unwrap();
        assert!(melody as i16 - top as i16 <= SPACING_MELODY_ACCOMP);
    }

    #[test]
    fn test_chord_coverage_preferred() {
        // With a melody plus three accompaniment voices, a triad should be
        // fully covered
        let (v, _) = voice_event("IV", "C", None);
        let pcs = v.pitch_classes();
        for pc in [5u8, 9, 0] {
            assert!(pcs.contains(&pc), "missing pitch class {}", pc);
        }
    }

    #[test]
    fn test_previous_voicing_steers_voices() {
        let (first, _) = voice_event("I", "C", None);
        let (second, _) = voice_event("V", "C", Some(&first));

        let a = first.get(VoiceId::Melody).unwrap() as i16;
        let b = second.get(VoiceId::Melody).unwrap() as i16;
        assert!((a - b).abs() <= 12);
    }
}
