//! Structured diagnostics emitted during harmonization.
//!
//! Voice-leading findings, incomplete voicings, and skipped measures are
//! reported as typed records collected alongside the generated output, so
//! callers and tests can assert on them instead of scraping log text.
//! None of these block generation.

#[cfg(feature = "colored")]
use colored::*;
use std::fmt;

use crate::types::time::Time;

/// Identifies a voice line across both generation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceId {
    Soprano,
    Alto,
    Tenor,
    Bass,
    Melody,
    /// Accompaniment voice, 0 = lowest.
    Accompaniment(u8),
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceId::Soprano => write!(f, "soprano"),
            VoiceId::Alto => write!(f, "alto"),
            VoiceId::Tenor => write!(f, "tenor"),
            VoiceId::Bass => write!(f, "bass"),
            VoiceId::Melody => write!(f, "melody"),
            VoiceId::Accompaniment(i) => write!(f, "accompaniment {}", i + 1),
        }
    }
}

/// Where in the piece a diagnostic was raised: measure index plus the beat
/// offset within the measure (1-based, exact).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub measure: usize,
    pub beat: Time,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}:b{}", self.measure + 1, self.beat)
    }
}

/// The closed set of reportable conditions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// Two voices moved while holding a perfect fifth between them.
    ParallelFifths { lower: VoiceId, upper: VoiceId },
    /// Two voices moved while holding an octave or unison between them.
    ParallelOctaves { lower: VoiceId, upper: VoiceId },
    /// A nominally lower voice sounds above the voice over it.
    VoiceCrossing { lower: VoiceId, upper: VoiceId },
    /// Adjacent voices exceed their spacing limit.
    SpacingExceeded {
        lower: VoiceId,
        upper: VoiceId,
        semitones: i16,
        limit: i16,
    },
    /// No legal pitch could be found for a voice; it was left unassigned.
    VoicingIncomplete { voice: VoiceId },
    /// The bass had no candidate matching the required pitch class and fell
    /// back to the full range.
    BassFallback,
    /// The rhythm generator could not fill the measure exactly.
    RhythmIncomplete,
    /// The measure's chord symbol could not be resolved; rests were
    /// substituted.
    UnresolvableChord { reason: String },
}

impl DiagnosticKind {
    fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::ParallelFifths { .. } => "parallel fifths",
            DiagnosticKind::ParallelOctaves { .. } => "parallel octaves",
            DiagnosticKind::VoiceCrossing { .. } => "voice crossing",
            DiagnosticKind::SpacingExceeded { .. } => "spacing",
            DiagnosticKind::VoicingIncomplete { .. } => "incomplete voicing",
            DiagnosticKind::BassFallback => "bass fallback",
            DiagnosticKind::RhythmIncomplete => "incomplete rhythm",
            DiagnosticKind::UnresolvableChord { .. } => "unresolvable chord",
        }
    }

    fn describe(&self) -> String {
        match self {
            DiagnosticKind::ParallelFifths { lower, upper }
            | DiagnosticKind::ParallelOctaves { lower, upper } => {
                format!("{} against {}", lower, upper)
            }
            DiagnosticKind::VoiceCrossing { lower, upper } => {
                format!("{} above {}", lower, upper)
            }
            DiagnosticKind::SpacingExceeded {
                lower,
                upper,
                semitones,
                limit,
            } => format!(
                "{}-{} span {} semitones (limit {})",
                lower, upper, semitones, limit
            ),
            DiagnosticKind::VoicingIncomplete { voice } => {
                format!("no legal pitch for {}", voice)
            }
            DiagnosticKind::BassFallback => "no in-range bass on the required pitch class".into(),
            DiagnosticKind::RhythmIncomplete => "measure not filled exactly".into(),
            DiagnosticKind::UnresolvableChord { reason } => reason.clone(),
        }
    }
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: Location,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: Location) -> Self {
        Diagnostic { kind, location }
    }
}

#[cfg(feature = "colored")]
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match &self.kind {
            DiagnosticKind::ParallelFifths { .. } | DiagnosticKind::ParallelOctaves { .. } => {
                self.kind.label().red().bold().to_string()
            }
            DiagnosticKind::UnresolvableChord { .. } => self.kind.label().red().to_string(),
            _ => self.kind.label().yellow().to_string(),
        };
        write!(
            f,
            "{} {}: {}",
            self.location.to_string().dimmed(),
            label,
            self.kind.describe()
        )
    }
}

// Plain Display impl for non-colored builds
#[cfg(not(feature = "colored"))]
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.location,
            self.kind.label(),
            self.kind.describe()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::time::time;

    #[test]
    fn test_display_names_voice_pair_and_location() {
        let d = Diagnostic::new(
            DiagnosticKind::ParallelFifths {
                lower: VoiceId::Tenor,
                upper: VoiceId::Soprano,
            },
            Location {
                measure: 2,
                beat: time(3, 1),
            },
        );
        let text = d.to_string();
        assert!(text.contains("m3:b3"));
        assert!(text.contains("parallel fifths"));
        assert!(text.contains("tenor"));
        assert!(text.contains("soprano"));
    }
}
