//! # Chorale Core
//!
//! Harmonization engine for chord progressions: resolves roman-numeral
//! symbols against a key, voices them as a four-part chorale or as melody
//! plus accompaniment with melodic-smoothness optimization, subdivides
//! measures with exact rational rhythm, and checks classical voice-leading
//! rules, reporting findings as structured diagnostics.
//!
//! ## Features
//!
//! - **serde**: Enable serialization for the data types
//! - **colored**: Enable colored terminal output for diagnostics
//!
//! ## Example
//!
//! ```ignore
//! use chorale_core::{GenerationSettings, Harmonizer};
//!
//! let mut harmonizer = Harmonizer::with_seed(GenerationSettings::default(), 42)?;
//! let piece = harmonizer.harmonize(&["I", "IV", "V7", "I"], "C", "4/4", 4)?;
//! println!("{} measures, {} findings", piece.measures.len(), piece.diagnostics.len());
//! ```

pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod harmony;
pub mod rhythm;
pub mod types;
pub mod voicing;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticKind, Location, VoiceId};
pub use driver::{GenerationSettings, GenerationStyle, HarmonizedPiece, Harmonizer};
pub use error::{HarmonyError, Result};
pub use types::{Key, Measure, Meter, Mode, MusicalEvent, Note, Staff};
