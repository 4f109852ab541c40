//! The harmonization driver: measures x rhythmic events, threading the
//! previous voicing from one chord event to the next.

use log::warn;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Location, VoiceId};
use crate::error::{invalid_input, Result};
use crate::harmony::pool::build_pitch_pool;
use crate::harmony::resolve::{resolve, ResolvedChord};
use crate::harmony::roman::RomanNumeral;
use crate::rhythm::generate_rhythm;
use crate::types::event::{Measure, MusicalEvent, Staff};
use crate::types::key::Key;
use crate::types::note::Note;
use crate::types::time::{time, DurationType, Meter, Time};
use crate::voicing::accomp::assign_melody_accompaniment;
use crate::voicing::rules::check_voice_leading;
use crate::voicing::satb::assign_satb;
use crate::voicing::select::SelectorConfig;
use crate::voicing::Voicing;

/// Output texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerationStyle {
    Satb,
    MelodyAccompaniment,
}

/// Caller-facing generation knobs, all on 0-10 scales.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationSettings {
    pub melodic_smoothness: u8,
    pub dissonance_strictness: u8,
    pub rhythmic_complexity: u8,
    pub style: GenerationStyle,
    /// Accompaniment chord size for the melody style.
    pub num_accompaniment_voices: u8,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            melodic_smoothness: 5,
            dissonance_strictness: 5,
            rhythmic_complexity: 5,
            style: GenerationStyle::Satb,
            num_accompaniment_voices: 3,
        }
    }
}

impl GenerationSettings {
    fn validate(&self) -> Result<()> {
        if self.melodic_smoothness > 10 {
            return Err(invalid_input!(
                "melodic_smoothness must be 0-10, got {}",
                self.melodic_smoothness
            ));
        }
        if self.dissonance_strictness > 10 {
            return Err(invalid_input!(
                "dissonance_strictness must be 0-10, got {}",
                self.dissonance_strictness
            ));
        }
        if self.rhythmic_complexity > 10 {
            return Err(invalid_input!(
                "rhythmic_complexity must be 0-10, got {}",
                self.rhythmic_complexity
            ));
        }
        if !(1..=5).contains(&self.num_accompaniment_voices) {
            return Err(invalid_input!(
                "num_accompaniment_voices must be 1-5, got {}",
                self.num_accompaniment_voices
            ));
        }
        Ok(())
    }
}

/// A finished harmonization: the measure/event sequence handed to the
/// serializer, plus every diagnostic raised along the way.
#[derive(Debug, Clone)]
pub struct HarmonizedPiece {
    pub key: Key,
    pub meter: Meter,
    pub measures: Vec<Measure>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives chord resolution, rhythm generation, and voice assignment over a
/// progression. Holds the only mutable cross-event state (the previous
/// voicing) and the random source.
pub struct Harmonizer {
    settings: GenerationSettings,
    selector: SelectorConfig,
    rng: Pcg32,
}

impl Harmonizer {
    pub fn new(settings: GenerationSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Harmonizer {
            settings,
            selector: SelectorConfig::default(),
            rng: Pcg32::from_entropy(),
        })
    }

    /// A harmonizer whose entire run is reproducible from the seed.
    pub fn with_seed(settings: GenerationSettings, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Harmonizer {
            settings,
            selector: SelectorConfig::default(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Override the note-selector thresholds.
    pub fn with_selector_config(mut self, selector: SelectorConfig) -> Self {
        self.selector = selector;
        self
    }

    /// Harmonize `measure_count` measures of the progression (cycling it
    /// when it is shorter) in the given key and meter.
    ///
    /// Key/meter/empty-progression problems abort with `InvalidInput`;
    /// per-measure resolution failures degrade to rest measures.
    pub fn harmonize<S: AsRef<str>>(
        &mut self,
        progression: &[S],
        key: &str,
        meter: &str,
        measure_count: usize,
    ) -> Result<HarmonizedPiece> {
        if progression.is_empty() {
            return Err(invalid_input!("Empty progression"));
        }
        if measure_count == 0 {
            return Err(invalid_input!("Measure count must be at least 1"));
        }
        let key: Key = key.parse()?;
        let meter: Meter = meter.parse()?;

        let mut measures = Vec::with_capacity(measure_count);
        let mut diagnostics = Vec::new();
        let mut previous: Option<Voicing> = None;

        for index in 0..measure_count {
            let token = progression[index % progression.len()].as_ref();

            let resolved = token
                .parse::<RomanNumeral>()
                .and_then(|numeral| resolve(&numeral, &key));

            match resolved {
                Ok(resolved) => {
                    let measure = self.harmonize_measure(
                        index,
                        token,
                        &resolved,
                        &key,
                        &meter,
                        &mut previous,
                        &mut diagnostics,
                    );
                    measures.push(measure);
                }
                Err(err) => {
                    // One bad chord degrades to a silent measure; voicing
                    // continuity restarts after it
                    warn!("measure {}: {}", index + 1, err);
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvableChord {
                            reason: err.to_string(),
                        },
                        Location {
                            measure: index,
                            beat: time(1, 1),
                        },
                    ));
                    measures.push(rest_measure(index, token, &meter));
                    previous = None;
                }
            }
        }

        Ok(HarmonizedPiece {
            key,
            meter,
            measures,
            diagnostics,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn harmonize_measure(
        &mut self,
        index: usize,
        token: &str,
        resolved: &ResolvedChord,
        key: &Key,
        meter: &Meter,
        previous: &mut Option<Voicing>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Measure {
        let pool = build_pitch_pool(&resolved.pitches);
        let pattern = generate_rhythm(meter, self.settings.rhythmic_complexity, &mut self.rng);

        let mut measure = Measure::new(index, token);

        if !pattern.complete {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::RhythmIncomplete,
                Location {
                    measure: index,
                    beat: time(1, 1),
                },
            ));
        }

        let mut offset = Time::new(0, 1);
        for slot in &pattern.slots {
            let location = Location {
                measure: index,
                beat: offset / meter.beat_duration() + time(1, 1),
            };

            let voicing = match self.settings.style {
                GenerationStyle::Satb => assign_satb(
                    resolved,
                    &pool,
                    previous.as_ref(),
                    key,
                    self.settings.melodic_smoothness,
                    &self.selector,
                    location,
                    diagnostics,
                ),
                GenerationStyle::MelodyAccompaniment => assign_melody_accompaniment(
                    resolved,
                    &pool,
                    previous.as_ref(),
                    self.settings.num_accompaniment_voices,
                    self.settings.melodic_smoothness,
                    &self.selector,
                    location,
                    diagnostics,
                ),
            };

            diagnostics.extend(check_voice_leading(
                &voicing,
                previous.as_ref(),
                self.settings.dissonance_strictness,
                location,
            ));

            match self.settings.style {
                GenerationStyle::Satb => emit_satb_events(&mut measure, &voicing, *slot),
                GenerationStyle::MelodyAccompaniment => {
                    emit_melody_events(&mut measure, &voicing, *slot, meter)
                }
            }

            *previous = Some(voicing);
            offset += slot.fraction();
        }

        measure
    }
}

/// SATB voice lines: soprano and alto on the treble staff, tenor and bass
/// on the bass staff.
const SATB_LINES: [(VoiceId, Staff, u8); 4] = [
    (VoiceId::Soprano, Staff::Treble, 1),
    (VoiceId::Alto, Staff::Treble, 2),
    (VoiceId::Tenor, Staff::Bass, 3),
    (VoiceId::Bass, Staff::Bass, 4),
];

fn emit_satb_events(measure: &mut Measure, voicing: &Voicing, slot: DurationType) {
    for (id, staff, line) in SATB_LINES {
        let event = match voicing.get(id).map(Note::from_midi) {
            Some(Ok(note)) => MusicalEvent::note(note, slot.ticks(), slot, staff, line),
            // An unplaceable voice rests through the event
            _ => MusicalEvent::rest(slot.ticks(), slot, staff, line),
        };
        measure.push(event);
    }
}

fn emit_melody_events(measure: &mut Measure, voicing: &Voicing, slot: DurationType, meter: &Meter) {
    // Melody on the treble staff
    let melody_event = match voicing.get(VoiceId::Melody).map(Note::from_midi) {
        Some(Ok(note)) => MusicalEvent::note(note, slot.ticks(), slot, Staff::Treble, 1),
        _ => MusicalEvent::rest(slot.ticks(), slot, Staff::Treble, 1),
    };
    measure.push(melody_event);

    // Accompaniment chord on the bass staff, ascending
    let pitches: Vec<Note> = voicing
        .voices()
        .iter()
        .filter(|(id, _)| matches!(id, VoiceId::Accompaniment(_)))
        .filter_map(|(_, p)| *p)
        .filter_map(|p| Note::from_midi(p).ok())
        .collect();

    if pitches.is_empty() {
        measure.push(MusicalEvent::rest(slot.ticks(), slot, Staff::Bass, 2));
        return;
    }

    let arpeggiate = slot.fraction() < meter.beat_duration() && pitches.len() > 1;
    if arpeggiate {
        // Short slots become a quick run-up instead of a stacked chord;
        // the remainder lands on the last note so ticks still sum exactly
        let share = slot.ticks() / pitches.len() as i64;
        let remainder = slot.ticks() - share * pitches.len() as i64;
        let count = pitches.len();
        for (i, note) in pitches.into_iter().enumerate() {
            let ticks = if i + 1 == count { share + remainder } else { share };
            let notated = DurationType::fitting_ticks(ticks);
            measure.push(MusicalEvent::note(note, ticks, notated, Staff::Bass, 2));
        }
    } else {
        for (i, note) in pitches.into_iter().enumerate() {
            let event = MusicalEvent::note(note, slot.ticks(), slot, Staff::Bass, 2);
            if i == 0 {
                measure.push(event);
            } else {
                measure.push(event.as_chord_continuation());
            }
        }
    }
}

/// A full measure of rests on both staves.
fn rest_measure(index: usize, token: &str, meter: &Meter) -> Measure {
    let mut measure = Measure::new(index, token);
    let ticks = meter.measure_ticks();
    measure.push(MusicalEvent::rest(ticks, DurationType::Whole, Staff::Treble, 1));
    measure.push(MusicalEvent::rest(ticks, DurationType::Whole, Staff::Bass, 2));
    measure
}
