//! Voice-leading rule checking between consecutive voicings.
//!
//! Stateless: inspects one transition at a time and emits diagnostics.
//! Findings never block generation. Each check is gated on the caller's
//! strictness (0-10); strictness 0-1 disables checking entirely.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Location, VoiceId};
use crate::voicing::{
    Voicing, SPACING_ALTO_TENOR, SPACING_MELODY_ACCOMP, SPACING_SOPRANO_ALTO, SPACING_TENOR_BASS,
};

/// Strictness at which crossing and spacing checks engage.
const STRICTNESS_LAYOUT: u8 = 2;
/// Strictness at which parallel-interval checks engage.
const STRICTNESS_PARALLELS: u8 = 3;

/// Spacing limit between two adjacent voices, if one is configured.
fn spacing_limit(lower: VoiceId, upper: VoiceId) -> Option<i16> {
    match (lower, upper) {
        (VoiceId::Alto, VoiceId::Soprano) => Some(SPACING_SOPRANO_ALTO),
        (VoiceId::Tenor, VoiceId::Alto) => Some(SPACING_ALTO_TENOR),
        (VoiceId::Bass, VoiceId::Tenor) => Some(SPACING_TENOR_BASS),
        (VoiceId::Accompaniment(_), VoiceId::Melody) => Some(SPACING_MELODY_ACCOMP),
        _ => None,
    }
}

/// Check one voicing transition. `previous` of None (start of piece or
/// after a reset) checks nothing.
pub fn check_voice_leading(
    current: &Voicing,
    previous: Option<&Voicing>,
    strictness: u8,
    location: Location,
) -> Vec<Diagnostic> {
    let mut findings = Vec::new();
    if strictness <= 1 {
        return findings;
    }
    let Some(previous) = previous else {
        return findings;
    };

    let voices = current.voices();

    if strictness >= STRICTNESS_LAYOUT {
        // Crossing and spacing between adjacent sounding voices
        for pair in voices.windows(2) {
            let (lower_id, Some(lower)) = pair[0] else { continue };
            let (upper_id, Some(upper)) = pair[1] else { continue };

            if lower > upper {
                findings.push(Diagnostic::new(
                    DiagnosticKind::VoiceCrossing {
                        lower: lower_id,
                        upper: upper_id,
                    },
                    location,
                ));
            }

            if let Some(limit) = spacing_limit(lower_id, upper_id) {
                let gap = upper as i16 - lower as i16;
                if gap > limit {
                    findings.push(Diagnostic::new(
                        DiagnosticKind::SpacingExceeded {
                            lower: lower_id,
                            upper: upper_id,
                            semitones: gap,
                            limit,
                        },
                        location,
                    ));
                }
            }
        }
    }

    if strictness >= STRICTNESS_PARALLELS {
        // Parallel perfect intervals: every pair where both voices moved
        // and the interval between them is unchanged
        for i in 0..voices.len() {
            for j in (i + 1)..voices.len() {
                let (lower_id, Some(lower)) = voices[i] else { continue };
                let (upper_id, Some(upper)) = voices[j] else { continue };
                let Some(prev_lower) = previous.get(lower_id) else { continue };
                let Some(prev_upper) = previous.get(upper_id) else { continue };

                let both_moved = lower != prev_lower && upper != prev_upper;
                if !both_moved {
                    continue;
                }

                let interval = (upper as i16 - lower as i16).abs();
                let prev_interval = (prev_upper as i16 - prev_lower as i16).abs();
                if interval != prev_interval {
                    continue;
                }

                if interval % 12 == 0 {
                    findings.push(Diagnostic::new(
                        DiagnosticKind::ParallelOctaves {
                            lower: lower_id,
                            upper: upper_id,
                        },
                        location,
                    ));
                } else if interval % 12 == 7 {
                    findings.push(Diagnostic::new(
                        DiagnosticKind::ParallelFifths {
                            lower: lower_id,
                            upper: upper_id,
                        },
                        location,
                    ));
                }
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::time::time;

    fn loc() -> Location {
        Location {
            measure: 0,
            beat: time(1, 1),
        }
    }

    fn satb(bass: u8, tenor: u8, alto: u8, soprano: u8) -> Voicing {
        Voicing::new(vec![
            (VoiceId::Bass, Some(bass)),
            (VoiceId::Tenor, Some(tenor)),
            (VoiceId::Alto, Some(alto)),
            (VoiceId::Soprano, Some(soprano)),
        ])
    }

    #[test]
    fn test_noop_without_previous_or_strictness() {
        let v = satb(48, 55, 64, 72);
        assert!(check_voice_leading(&v, None, 10, loc()).is_empty());

        let prev = satb(50, 57, 65, 74);
        assert!(check_voice_leading(&v, Some(&prev), 1, loc()).is_empty());
    }

    #[test]
    fn test_detects_parallel_fifths() {
        // Bass and tenor a fifth apart in both chords, both moving up
        let prev = satb(48, 55, 64, 72);
        let cur = satb(50, 57, 65, 74);
        let findings = check_voice_leading(&cur, Some(&prev), 5, loc());
        assert!(findings.iter().any(|d| matches!(
            d.kind,
            DiagnosticKind::ParallelFifths {
                lower: VoiceId::Bass,
                upper: VoiceId::Tenor
            }
        )));
    }

    #[test]
    fn test_detects_parallel_octaves() {
        let prev = satb(48, 55, 64, 60 + 12);
        let cur = satb(50, 57, 65, 62 + 12);
        let findings = check_voice_leading(&cur, Some(&prev), 5, loc());
        assert!(findings.iter().any(|d| matches!(
            d.kind,
            DiagnosticKind::ParallelOctaves {
                lower: VoiceId::Bass,
                upper: VoiceId::Soprano
            }
        )));
    }

    #[test]
    fn test_oblique_motion_is_not_parallel() {
        // The bass holds while the tenor moves: no parallel even though
        // the interval repeats an octave
        let prev = satb(48, 60, 64, 72);
        let cur = satb(48, 60, 65, 74);
        let findings = check_voice_leading(&cur, Some(&prev), 5, loc());
        assert!(!findings
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::ParallelOctaves { .. })));
    }

    #[test]
    fn test_detects_crossing_and_spacing() {
        let prev = satb(48, 55, 64, 72);
        // Tenor above alto; soprano a 14th above alto
        let crossed = satb(48, 66, 64, 72);
        let findings = check_voice_leading(&crossed, Some(&prev), 5, loc());
        assert!(findings
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::VoiceCrossing { .. })));

        let spread = satb(48, 55, 57, 74);
        let findings = check_voice_leading(&spread, Some(&prev), 5, loc());
        assert!(findings.iter().any(|d| matches!(
            d.kind,
            DiagnosticKind::SpacingExceeded {
                lower: VoiceId::Alto,
                upper: VoiceId::Soprano,
                ..
            }
        )));
    }

    #[test]
    fn test_strictness_gates_parallels_separately() {
        let prev = satb(48, 55, 64, 72);
        let cur = satb(50, 57, 65, 74);
        // Strictness 2: layout checks only, the parallel fifth passes
        let findings = check_voice_leading(&cur, Some(&prev), 2, loc());
        assert!(!findings
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::ParallelFifths { .. })));
    }

    #[test]
    fn test_contrary_motion_to_fifth_is_clean() {
        // Voices arrive at a fifth from different intervals: not parallel
        let prev = satb(48, 53, 64, 72);
        let cur = satb(46, 53, 65, 74);
        let findings = check_voice_leading(&cur, Some(&prev), 5, loc());
        assert!(!findings
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::ParallelFifths { .. })));
    }
}
