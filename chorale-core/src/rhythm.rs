//! Rhythmic subdivision of measures.
//!
//! A measure is filled greedily with note values drawn by weighted random
//! choice, tracking the remaining duration as an exact rational so the
//! pattern sums to the measure total with zero drift.

use crate::types::time::{DurationType, Meter, Time};
use num_traits::Zero;
use rand::Rng;

/// One measure's rhythm: note values in playing order.
#[derive(Debug, Clone, PartialEq)]
pub struct RhythmPattern {
    pub slots: Vec<DurationType>,
    /// False when the fill loop could not reach the measure total exactly.
    /// Reported as a diagnostic by the driver, never a hard failure.
    pub complete: bool,
}

/// Weight tables per complexity tier, indexed like [`DurationType::ALL`]
/// (whole, half, quarter, eighth, 16th, 32nd). Low tiers favor long values,
/// high tiers favor subdivisions.
fn weights_for_complexity(complexity: u8) -> [u32; 6] {
    match complexity {
        0..=2 => [2, 6, 8, 1, 0, 0],
        3..=5 => [1, 4, 8, 5, 1, 0],
        6..=8 => [0, 2, 5, 8, 4, 1],
        _ => [0, 1, 3, 8, 6, 2],
    }
}

/// Weighted pick over the eligible values; uniform fallback when every
/// eligible weight is zero.
fn pick_value(
    eligible: &[(DurationType, u32)],
    rng: &mut impl Rng,
) -> DurationType {
    let total: u32 = eligible.iter().map(|(_, w)| w).sum();
    if total == 0 {
        let idx = rng.gen_range(0..eligible.len());
        return eligible[idx].0;
    }

    let mut roll = rng.gen_range(0..total);
    for &(value, weight) in eligible {
        if roll < weight {
            return value;
        }
        roll -= weight;
    }
    // The scan always terminates inside the loop; appease the checker
    eligible[eligible.len() - 1].0
}

/// Generate one measure's rhythm for the given meter and complexity (0-10).
pub fn generate_rhythm(meter: &Meter, complexity: u8, rng: &mut impl Rng) -> RhythmPattern {
    let weights = weights_for_complexity(complexity.min(10));
    let mut remaining: Time = meter.measure_duration();
    let mut slots = Vec::new();

    while !remaining.is_zero() {
        let eligible: Vec<(DurationType, u32)> = DurationType::ALL
            .iter()
            .zip(weights.iter())
            .filter(|(value, _)| value.fraction() <= remaining)
            .map(|(&value, &weight)| (value, weight))
            .collect();

        if eligible.is_empty() {
            // Unreachable while 32nds divide every supported measure, but
            // an inexpressible remainder must not hang the loop
            return RhythmPattern {
                slots,
                complete: false,
            };
        }

        let value = pick_value(&eligible, rng);
        remaining -= value.fraction();
        slots.push(value);
    }

    RhythmPattern {
        slots,
        complete: true,
    }
}
