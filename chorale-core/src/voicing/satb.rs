//! Four-part (SATB) voice assignment for one chord event.
//!
//! Voices are placed in dependency order: bass first (it carries the
//! required bass pitch class), then soprano, then the inner voices under
//! spacing and ordering constraints. A voice with no legal candidate is
//! left unassigned and reported, never fatal.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Location, VoiceId};
use crate::harmony::resolve::ResolvedChord;
use crate::types::key::Key;
use crate::voicing::select::{closest_note, SelectorConfig};
use crate::voicing::{
    Voicing, ALTO_RANGE, BASS_RANGE, SOPRANO_RANGE, SPACING_ALTO_TENOR, SPACING_SOPRANO_ALTO,
    SPACING_TENOR_BASS, TENOR_RANGE,
};

/// Assign all four voices for one chord event.
///
/// `previous` is the last fully-attempted voicing (possibly incomplete);
/// it is read only, never mutated.
pub fn assign_satb(
    resolved: &ResolvedChord,
    pool: &[u8],
    previous: Option<&Voicing>,
    key: &Key,
    smoothness: u8,
    cfg: &SelectorConfig,
    location: Location,
    diagnostics: &mut Vec<Diagnostic>,
) -> Voicing {
    let prev = |id: VoiceId| previous.and_then(|v| v.get(id));

    // --- Bass ---------------------------------------------------------
    let bass_pc = resolved.bass_pc();
    let bass_candidates: Vec<u8> = pool
        .iter()
        .copied()
        .filter(|&p| BASS_RANGE.contains(p))
        .collect();
    let on_pc: Vec<u8> = bass_candidates
        .iter()
        .copied()
        .filter(|&p| p % 12 == bass_pc)
        .collect();

    let bass_target = prev(VoiceId::Bass)
        .unwrap_or_else(|| BASS_RANGE.clamp(resolved.chord.root().midi() - 12));

    let bass = if on_pc.is_empty() {
        if !bass_candidates.is_empty() {
            diagnostics.push(Diagnostic::new(DiagnosticKind::BassFallback, location));
        }
        closest_note(bass_target, &bass_candidates, prev(VoiceId::Bass), smoothness, cfg)
    } else {
        closest_note(bass_target, &on_pc, prev(VoiceId::Bass), smoothness, cfg)
    };

    // --- Soprano ------------------------------------------------------
    let soprano_candidates: Vec<u8> = pool
        .iter()
        .copied()
        .filter(|&p| SOPRANO_RANGE.contains(p))
        .filter(|&p| bass.map_or(true, |b| p > b))
        .collect();

    // Previous soprano nudged slightly upward keeps the top line moving
    let soprano_target = prev(VoiceId::Soprano)
        .map(|p| p.saturating_add(2).min(SOPRANO_RANGE.max))
        .unwrap_or_else(|| SOPRANO_RANGE.center());

    let soprano = closest_note(
        soprano_target,
        &soprano_candidates,
        prev(VoiceId::Soprano),
        smoothness,
        cfg,
    );

    // --- Inner voice targets ------------------------------------------
    let chord_pcs = resolved.pitch_classes();
    let covered: Vec<u8> = [bass, soprano].iter().flatten().map(|p| p % 12).collect();
    let mut targets: Vec<u8> = chord_pcs
        .iter()
        .copied()
        .filter(|pc| !covered.contains(pc))
        .collect();

    if targets.len() < 2 {
        // Doubling priority: root, then fifth, then third, never the
        // leading tone
        let leading = key.leading_tone_pc();
        let root_pc = resolved.root_pc();
        let fifth_pc = chord_pcs.get(2).copied().unwrap_or(root_pc);
        let third_pc = chord_pcs.get(1).copied().unwrap_or(root_pc);
        for pc in [root_pc, fifth_pc, third_pc] {
            if targets.len() >= 2 {
                break;
            }
            if pc != leading {
                targets.push(pc);
            }
        }
        // A chord of nothing but leading tones cannot happen; two targets
        // always exist past this point for any real chord
        while targets.len() < 2 {
            targets.push(root_pc);
        }
    }
    let (alto_pc, tenor_pc) = (targets[0], targets[1]);

    // --- Alto ---------------------------------------------------------
    let alto_candidates: Vec<u8> = pool
        .iter()
        .copied()
        .filter(|&p| ALTO_RANGE.contains(p))
        .filter(|&p| soprano.map_or(true, |s| p < s))
        .filter(|&p| bass.map_or(true, |b| p > b))
        .filter(|&p| soprano.map_or(true, |s| s as i16 - p as i16 <= SPACING_SOPRANO_ALTO))
        .collect();

    let alto_target = prev(VoiceId::Alto).unwrap_or_else(|| match (bass, soprano) {
        (Some(b), Some(s)) => ((b as u16 + s as u16) / 2) as u8,
        _ => ALTO_RANGE.center(),
    });

    let alto = pick_inner(
        alto_pc,
        &alto_candidates,
        alto_target,
        prev(VoiceId::Alto),
        smoothness,
        cfg,
    );
    if alto.is_none() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::VoicingIncomplete { voice: VoiceId::Alto },
            location,
        ));
    }

    // --- Tenor --------------------------------------------------------
    let upper_bound = alto.or(soprano);
    let tenor_candidates: Vec<u8> = pool
        .iter()
        .copied()
        .filter(|&p| TENOR_RANGE.contains(p))
        .filter(|&p| upper_bound.map_or(true, |u| p < u))
        .filter(|&p| bass.map_or(true, |b| p > b))
        .filter(|&p| alto.map_or(true, |a| a as i16 - p as i16 <= SPACING_ALTO_TENOR))
        .filter(|&p| bass.map_or(true, |b| p as i16 - b as i16 <= SPACING_TENOR_BASS))
        .collect();

    let tenor_target = prev(VoiceId::Tenor)
        .unwrap_or_else(|| bass.map_or_else(|| TENOR_RANGE.center(), |b| TENOR_RANGE.clamp(b as i16 + 7)));

    let mut tenor = pick_inner(
        tenor_pc,
        &tenor_candidates,
        tenor_target,
        prev(VoiceId::Tenor),
        smoothness,
        cfg,
    );

    // Ordering inconsistency guard: retry strictly below the alto
    if let (Some(t), Some(a)) = (tenor, alto) {
        if t >= a {
            let below: Vec<u8> = tenor_candidates.iter().copied().filter(|&p| p < a).collect();
            tenor = closest_note(tenor_target, &below, prev(VoiceId::Tenor), smoothness, cfg);
        }
    }
    if tenor.is_none() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::VoicingIncomplete { voice: VoiceId::Tenor },
            location,
        ));
    }
    if bass.is_none() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::VoicingIncomplete { voice: VoiceId::Bass },
            location,
        ));
    }
    if soprano.is_none() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::VoicingIncomplete { voice: VoiceId::Soprano },
            location,
        ));
    }

    Voicing::new(vec![
        (VoiceId::Bass, bass),
        (VoiceId::Tenor, tenor),
        (VoiceId::Alto, alto),
        (VoiceId::Soprano, soprano),
    ])
}

/// Inner-voice selection: try the target pitch class first, fall back to
/// the full constrained set.
fn pick_inner(
    target_pc: u8,
    candidates: &[u8],
    target: u8,
    previous: Option<u8>,
    smoothness: u8,
    cfg: &SelectorConfig,
) -> Option<u8> {
    let on_pc: Vec<u8> = candidates
        .iter()
        .copied()
        .filter(|&p| p % 12 == target_pc)
        .collect();
    if let Some(pitch) = closest_note(target, &on_pc, previous, smoothness, cfg) {
        return Some(pitch);
    }
    closest_note(target, candidates, previous, smoothness, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::pool::build_pitch_pool;
    use crate::harmony::resolve::resolve;
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
        let voicing = assign_satb(
            &resolved,
            &pool,
            previous,
            &key,
            5,
            &SelectorConfig::default(),
            loc(),
            &mut diags,
        );
        (voicing, diags)
    }

    #[test]
    fn test_tonic_voicing_is_complete_and_ordered() {
        let (v, _) = voice_event("I", "C", None);
        assert!(v.is_complete());

        let bass = v.get(VoiceId::Bass).unwrap();
        let tenor = v.get(VoiceId::Tenor).unwrap();
        let alto = v.get(VoiceId::Alto).unwrap();
        let soprano = v.get(VoiceId::Soprano).unwrap();

        assert!(bass < tenor && tenor < alto && alto < soprano);
        assert!(soprano as i16 - alto as i16 <= SPACING_SOPRANO_ALTO);
        assert!(alto as i16 - tenor as i16 <= SPACING_ALTO_TENOR);
        assert!(tenor as i16 - bass as i16 <= SPACING_TENOR_BASS);

        // Bass carries the root of a root-position chord
        assert_eq!(bass % 12, 0);
    }

    #[test]
    fn test_all_chord_tones_sound() {
        let (v, _) = voice_event("I", "C", None);
        let pcs = v.pitch_classes();
        for pc in [0u8, 4, 7] {
            assert!(pcs.contains(&pc), "missing pitch class {}", pc);
        }
    }

    #[test]
    fn test_inverted_chord_forces_bass_pitch_class() {
        // ii6 in C: F must sound in the bass
        let (v, _) = voice_event("ii6", "C", None);
        assert_eq!(v.get(VoiceId::Bass).unwrap() % 12, 5);
    }

    #[test]
    fn test_leading_tone_not_doubled() {
        // V in C: the chord holds G B D; B (the leading tone) must appear
        // at most once
        let (v, _) = voice_event("V", "C", None);
        let count = v.pitch_classes().iter().filter(|&&pc| pc == 11).count();
        assert!(count <= 1, "leading tone doubled");
    }

    #[test]
    fn test_voices_stay_in_range() {
        for token in ["I", "ii6", "V7", "vi", "I64"] {
            let (v, _) = voice_event(token, "G", None);
            if let Some(p) = v.get(VoiceId::Bass) {
                assert!(BASS_RANGE.contains(p));
            }
            if let Some(p) = v.get(VoiceId::Tenor) {
                assert!(TENOR_RANGE.contains(p));
            }
            if let Some(p) = v.get(VoiceId::Alto) {
                assert!(ALTO_RANGE.contains(p));
            }
            if let Some(p) = v.get(VoiceId::Soprano) {
                assert!(SOPRANO_RANGE.contains(p));
            }
        }
    }

    #[test]
    fn test_voices_follow_previous_smoothly() {
        let (first, _) = voice_event("I", "C", None);
        let (second, _) = voice_event("IV", "C", Some(&first));

        // Each voice moves, but not absurdly far from where it was
        for id in [VoiceId::Bass, VoiceId::Tenor, VoiceId::Alto, VoiceId::Soprano] {
            let a = first.get(id).unwrap() as i16;
            let b = second.get(id).unwrap() as i16;
            assert!((a - b).abs() <= 12, "{:?} leapt {} semitones", id, (a - b).abs());
        }
    }
}
