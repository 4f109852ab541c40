//! Rational timing types for exact musical durations
//!
//! All beat and measure arithmetic uses rationals (fractions of a whole
//! note) so rhythm generation fills measures with zero drift. Ticks are
//! derived from the rational value at the MIDI-standard resolution.

use crate::error::{invalid_input, HarmonyError, Result};
use num_rational::Ratio;
use std::fmt;
use std::str::FromStr;

/// Exact musical duration in whole-note units.
/// Uses i64 for large numerator/denominator support.
pub type Time = Ratio<i64>;

/// Tick resolution: 480 ticks per quarter note.
pub const TICKS_PER_QUARTER: i64 = 480;

/// Helper to create Time from a ratio n/d
#[inline]
pub fn time(n: i64, d: i64) -> Time {
    Ratio::new(n, d)
}

/// Convert a whole-note fraction to ticks. Exact for every supported
/// duration (the smallest, a 32nd, is 60 ticks).
#[inline]
pub fn to_ticks(t: Time) -> i64 {
    let scaled = t * Ratio::from_integer(4 * TICKS_PER_QUARTER);
    scaled.to_integer()
}

/// A simple meter: beats per measure over a power-of-two beat unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    pub beats: u32,
    pub unit: u32,
}

impl Meter {
    pub fn new(beats: u32, unit: u32) -> Result<Self> {
        if beats == 0 {
            return Err(invalid_input!("Meter must have at least one beat"));
        }
        if !matches!(unit, 1 | 2 | 4 | 8 | 16 | 32) {
            return Err(invalid_input!(
                "Beat unit must be one of 1, 2, 4, 8, 16, 32; got {}",
                unit
            ));
        }
        Ok(Meter { beats, unit })
    }

    /// Total measure duration as a whole-note fraction (4/4 = 1, 6/8 = 3/4).
    pub fn measure_duration(&self) -> Time {
        time(self.beats as i64, self.unit as i64)
    }

    /// Duration of one beat as a whole-note fraction.
    pub fn beat_duration(&self) -> Time {
        time(1, self.unit as i64)
    }

    /// Total measure duration in ticks.
    pub fn measure_ticks(&self) -> i64 {
        to_ticks(self.measure_duration())
    }
}

impl FromStr for Meter {
    type Err = HarmonyError;

    fn from_str(s: &str) -> Result<Self> {
        let (beats, unit) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid_input!("Meter must be \"beats/unit\", got {:?}", s))?;
        let beats: u32 = beats
            .parse()
            .map_err(|_| invalid_input!("Invalid beat count in meter {:?}", s))?;
        let unit: u32 = unit
            .parse()
            .map_err(|_| invalid_input!("Invalid beat unit in meter {:?}", s))?;
        Meter::new(beats, unit)
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.unit)
    }
}

/// Notated note values available to the rhythm generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DurationType {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl DurationType {
    /// All values, longest first.
    pub const ALL: [DurationType; 6] = [
        DurationType::Whole,
        DurationType::Half,
        DurationType::Quarter,
        DurationType::Eighth,
        DurationType::Sixteenth,
        DurationType::ThirtySecond,
    ];

    /// The value as a whole-note fraction.
    pub fn fraction(&self) -> Time {
        match self {
            DurationType::Whole => time(1, 1),
            DurationType::Half => time(1, 2),
            DurationType::Quarter => time(1, 4),
            DurationType::Eighth => time(1, 8),
            DurationType::Sixteenth => time(1, 16),
            DurationType::ThirtySecond => time(1, 32),
        }
    }

    /// The value in ticks.
    pub fn ticks(&self) -> i64 {
        to_ticks(self.fraction())
    }

    /// MusicXML type name.
    pub fn name(&self) -> &'static str {
        match self {
            DurationType::Whole => "whole",
            DurationType::Half => "half",
            DurationType::Quarter => "quarter",
            DurationType::Eighth => "eighth",
            DurationType::Sixteenth => "16th",
            DurationType::ThirtySecond => "32nd",
        }
    }

    /// Largest notated value whose tick length does not exceed `ticks`.
    /// Used as a display hint for durations that arise from splitting
    /// (arpeggiated chords); falls back to the shortest value.
    pub fn fitting_ticks(ticks: i64) -> DurationType {
        for value in DurationType::ALL {
            if value.ticks() <= ticks {
                return value;
            }
        }
        DurationType::ThirtySecond
    }
}
