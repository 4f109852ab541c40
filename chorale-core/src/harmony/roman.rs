//! Roman-numeral token parsing.
//!
//! A token like "ii65" or "V7/3" is parsed exactly once into a closed
//! [`RomanNumeral`] value; everything downstream pattern-matches on it.
//! The figured-bass-to-factor table lives here and nowhere else.

use crate::error::{invalid_input, HarmonyError, Result};
use crate::types::chord::ChordFactor;
use std::fmt;
use std::str::FromStr;

/// Scale degree I-VII as written, independent of key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleDegree {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

impl ScaleDegree {
    /// Zero-based index for key lookups.
    pub fn index(&self) -> usize {
        match self {
            ScaleDegree::I => 0,
            ScaleDegree::II => 1,
            ScaleDegree::III => 2,
            ScaleDegree::IV => 3,
            ScaleDegree::V => 4,
            ScaleDegree::VI => 5,
            ScaleDegree::VII => 6,
        }
    }

    fn from_stem(stem: &str) -> Option<ScaleDegree> {
        match stem {
            "i" => Some(ScaleDegree::I),
            "ii" => Some(ScaleDegree::II),
            "iii" => Some(ScaleDegree::III),
            "iv" => Some(ScaleDegree::IV),
            "v" => Some(ScaleDegree::V),
            "vi" => Some(ScaleDegree::VI),
            "vii" => Some(ScaleDegree::VII),
            _ => None,
        }
    }

    fn numeral(&self) -> &'static str {
        match self {
            ScaleDegree::I => "I",
            ScaleDegree::II => "II",
            ScaleDegree::III => "III",
            ScaleDegree::IV => "IV",
            ScaleDegree::V => "V",
            ScaleDegree::VI => "VI",
            ScaleDegree::VII => "VII",
        }
    }
}

/// Explicit quality suffix on a token (dim/°, aug/+, M, m).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QualityOverride {
    Major,
    Minor,
    Diminished,
    Augmented,
}

/// How a requested seventh's quality is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeventhMarker {
    /// Bare "7": the key's per-degree default decides.
    Default,
    /// "ø" / "ø7": diminished triad with a minor seventh.
    HalfDiminished,
    /// "°7": diminished triad with a diminished seventh.
    FullyDiminished,
}

/// A fully parsed roman-numeral chord token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RomanNumeral {
    pub degree: ScaleDegree,
    /// Written case of the numeral. Informational: the diatonic triad from
    /// the key decides the quality unless an explicit suffix overrides it.
    pub lowercase: bool,
    pub quality: Option<QualityOverride>,
    pub seventh: Option<SeventhMarker>,
    /// Which chord factor must sound in the bass (Root when uninverted).
    pub bass: ChordFactor,
}

/// The figured-bass table: figure digits to (seventh requested, bass factor).
fn figure_to_bass(figure: &str) -> Option<(bool, ChordFactor)> {
    match figure {
        "" => Some((false, ChordFactor::Root)),
        "6" => Some((false, ChordFactor::Third)),
        "64" => Some((false, ChordFactor::Fifth)),
        "7" => Some((true, ChordFactor::Root)),
        "65" => Some((true, ChordFactor::Third)),
        "43" => Some((true, ChordFactor::Fifth)),
        "42" | "2" => Some((true, ChordFactor::Seventh)),
        _ => None,
    }
}

/// Slash-bass digit to chord factor ("V/3" puts the third in the bass).
fn slash_to_factor(digit: &str) -> Option<ChordFactor> {
    match digit {
        "1" => Some(ChordFactor::Root),
        "3" => Some(ChordFactor::Third),
        "5" => Some(ChordFactor::Fifth),
        "7" => Some(ChordFactor::Seventh),
        _ => None,
    }
}

impl FromStr for RomanNumeral {
    type Err = HarmonyError;

    fn from_str(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(invalid_input!("Empty roman numeral token"));
        }

        // Split off an explicit slash bass first: "V7/3"
        let (body, slash) = match input.split_once('/') {
            Some((body, slash)) => (body, Some(slash)),
            None => (input, None),
        };

        let mut chars = body.chars().peekable();

        // The numeral stem: a run of i/v letters
        let mut stem = String::new();
        while let Some(&ch) = chars.peek() {
            if matches!(ch, 'i' | 'I' | 'v' | 'V') {
                stem.push(chars.next().unwrap());
            } else {
                break;
            }
        }

        if stem.is_empty() {
            return Err(invalid_input!("Invalid roman numeral: {}", input));
        }

        let lowercase = stem.chars().all(|c| c.is_lowercase());
        let degree = ScaleDegree::from_stem(&stem.to_lowercase())
            .ok_or_else(|| invalid_input!("Unknown roman numeral: {}", stem))?;

        // Optional quality suffix
        let mut quality = None;
        let mut seventh: Option<SeventhMarker> = None;
        match chars.peek() {
            Some('°') | Some('o') => {
                chars.next();
                quality = Some(QualityOverride::Diminished);
            }
            Some('ø') => {
                chars.next();
                quality = Some(QualityOverride::Diminished);
                seventh = Some(SeventhMarker::HalfDiminished);
            }
            Some('+') => {
                chars.next();
                quality = Some(QualityOverride::Augmented);
            }
            Some('d') => {
                // "dim"
                let rest: String = chars.clone().collect();
                if rest.starts_with("dim") {
                    for _ in 0.."dim".len() {
                        chars.next();
                    }
                    quality = Some(QualityOverride::Diminished);
                } else {
                    return Err(invalid_input!("Unknown quality suffix in {}", input));
                }
            }
            Some('a') => {
                // "aug"
                let rest: String = chars.clone().collect();
                if rest.starts_with("aug") {
                    for _ in 0.."aug".len() {
                        chars.next();
                    }
                    quality = Some(QualityOverride::Augmented);
                } else {
                    return Err(invalid_input!("Unknown quality suffix in {}", input));
                }
            }
            Some('M') => {
                chars.next();
                quality = Some(QualityOverride::Major);
            }
            Some('m') => {
                chars.next();
                quality = Some(QualityOverride::Minor);
            }
            _ => {}
        }

        // The remaining text must be a recognized figure (possibly empty)
        let figure: String = chars.collect();
        if !figure.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid_input!("Unexpected trailing text in {}", input));
        }

        let (figure_seventh, figure_bass) = figure_to_bass(&figure)
            .ok_or_else(|| invalid_input!("Unrecognized figure \"{}\" in {}", figure, input))?;

        // "iiø7" already carries its marker; only a bare figure sets Default
        if figure_seventh && seventh.is_none() {
            seventh = Some(SeventhMarker::Default);
        }

        // "°7" upgrades a plain diminished marker to a fully diminished seventh
        if quality == Some(QualityOverride::Diminished) && seventh == Some(SeventhMarker::Default) {
            seventh = Some(SeventhMarker::FullyDiminished);
        }

        // Resolve the bass: slash notation wins, and conflicts are errors
        let bass = match slash {
            Some(digit) => {
                if figure_bass != ChordFactor::Root {
                    return Err(invalid_input!(
                        "Both a figure and a slash bass in {}",
                        input
                    ));
                }
                slash_to_factor(digit)
                    .ok_or_else(|| invalid_input!("Invalid slash bass \"{}\" in {}", digit, input))?
            }
            None => figure_bass,
        };

        Ok(RomanNumeral {
            degree,
            lowercase,
            quality,
            seventh,
            bass,
        })
    }
}

impl fmt::Display for RomanNumeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeral = self.degree.numeral();
        if self.lowercase {
            write!(f, "{}", numeral.to_lowercase())?;
        } else {
            write!(f, "{}", numeral)?;
        }
        match self.quality {
            Some(QualityOverride::Diminished)
                if self.seventh == Some(SeventhMarker::HalfDiminished) =>
            {
                write!(f, "ø")?
            }
            Some(QualityOverride::Diminished) => write!(f, "°")?,
            Some(QualityOverride::Augmented) => write!(f, "+")?,
            Some(QualityOverride::Major) => write!(f, "M")?,
            Some(QualityOverride::Minor) => write!(f, "m")?,
            None => {}
        }
        let figure = match (self.seventh.is_some(), self.bass) {
            (false, ChordFactor::Root) => "",
            (false, ChordFactor::Third) => "6",
            (false, ChordFactor::Fifth) => "64",
            (false, ChordFactor::Seventh) => "/7",
            (true, ChordFactor::Root) => "7",
            (true, ChordFactor::Third) => "65",
            (true, ChordFactor::Fifth) => "43",
            (true, ChordFactor::Seventh) => "42",
        };
        write!(f, "{}", figure)
    }
}
