//! Chord symbol parsing, resolution, and candidate pitch material.

pub mod draft;
pub mod pool;
pub mod resolve;
pub mod roman;

pub use draft::{draft_progression, draft_progression_seeded, named_progression};
pub use pool::build_pitch_pool;
pub use resolve::{resolve, ResolvedChord};
pub use roman::{QualityOverride, RomanNumeral, ScaleDegree, SeventhMarker};
