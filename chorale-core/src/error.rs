//! Error taxonomy for the harmonization engine.
//!
//! Two failure classes cross the crate boundary: caller-supplied syntax
//! that cannot be parsed (fatal for the request), and music-theory
//! resolution failures (recovered per-measure by the driver). Soft voicing
//! problems never become errors; they are reported through
//! [`crate::diagnostics`].

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum HarmonyError {
    /// Malformed caller input: key, meter, roman-numeral syntax, or
    /// out-of-range settings. Aborts the generation request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal resolution step produced an unresolvable chord.
    /// The driver catches this per measure and substitutes rests.
    #[error("music theory error: {0}")]
    MusicTheory(String),
}

pub type Result<T> = std::result::Result<T, HarmonyError>;

/// Shorthand for `HarmonyError::InvalidInput` with formatting.
macro_rules! invalid_input {
    ($($arg:tt)*) => {
        $crate::error::HarmonyError::InvalidInput(format!($($arg)*))
    };
}

/// Shorthand for `HarmonyError::MusicTheory` with formatting.
macro_rules! theory_error {
    ($($arg:tt)*) => {
        $crate::error::HarmonyError::MusicTheory(format!($($arg)*))
    };
}

pub(crate) use {invalid_input, theory_error};
