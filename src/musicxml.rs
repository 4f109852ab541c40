//! MusicXML serialization of a harmonized piece.
//!
//! Emits a score-partwise document with a single two-staff piano part.
//! String-building only; the abstract events carry everything needed.

use chorale_core::types::time::TICKS_PER_QUARTER;
use chorale_core::types::{Measure, Staff};
use chorale_core::{HarmonizedPiece, Key, Mode};
use std::fmt::Write;

/// Circle-of-fifths position for the key signature element. Minor keys
/// sign with their relative major.
fn fifths_for_key(key: &Key) -> i32 {
    let pc = match key.mode() {
        Mode::Major => key.tonic().pitch_class(),
        Mode::Minor => (key.tonic().pitch_class() + 3) % 12,
    } as i32;

    // Prefer the flatter spelling only past six sharps
    for fifths in -5i32..=6 {
        if (fifths * 7).rem_euclid(12) == pc {
            return fifths;
        }
    }
    0
}

fn mode_name(key: &Key) -> &'static str {
    match key.mode() {
        Mode::Major => "major",
        Mode::Minor => "minor",
    }
}

/// Serialize the piece to a complete MusicXML document.
pub fn to_musicxml(piece: &HarmonizedPiece, title: &str) -> String {
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(
        "<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \
         \"http://www.musicxml.org/dtds/partwise.dtd\">\n",
    );
    xml.push_str("<score-partwise version=\"3.1\">\n");

    let _ = writeln!(xml, "  <work><work-title>{}</work-title></work>", title);
    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\"><part-name>Piano</part-name></score-part>\n");
    xml.push_str("  </part-list>\n");
    xml.push_str("  <part id=\"P1\">\n");

    for measure in &piece.measures {
        write_measure(&mut xml, piece, measure);
    }

    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");
    xml
}

fn write_measure(xml: &mut String, piece: &HarmonizedPiece, measure: &Measure) {
    let _ = writeln!(xml, "    <measure number=\"{}\">", measure.index + 1);

    if measure.index == 0 {
        let _ = writeln!(
            xml,
            "      <attributes>\n        <divisions>{}</divisions>\n        \
             <key><fifths>{}</fifths><mode>{}</mode></key>\n        \
             <time><beats>{}</beats><beat-type>{}</beat-type></time>\n        \
             <staves>2</staves>\n        \
             <clef number=\"1\"><sign>G</sign><line>2</line></clef>\n        \
             <clef number=\"2\"><sign>F</sign><line>4</line></clef>\n      </attributes>",
            TICKS_PER_QUARTER,
            fifths_for_key(&piece.key),
            mode_name(&piece.key),
            piece.meter.beats,
            piece.meter.unit,
        );
    }

    // Distinct voice lines in staff order; a <backup> rewinds the measure
    // between lines
    let mut lines: Vec<(Staff, u8)> = measure.events.iter().map(|e| (e.staff, e.voice)).collect();
    lines.sort();
    lines.dedup();

    for (i, &(staff, voice)) in lines.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(
                xml,
                "      <backup><duration>{}</duration></backup>",
                piece.meter.measure_ticks()
            );
        }

        for event in measure.events.iter().filter(|e| e.staff == staff && e.voice == voice) {
            let staff_number = match staff {
                Staff::Treble => 1,
                Staff::Bass => 2,
            };

            xml.push_str("      <note>");
            if event.chord_continuation {
                xml.push_str("<chord/>");
            }
            match event.pitch {
                Some(note) => {
                    let details = note.details();
                    xml.push_str("<pitch>");
                    let _ = write!(xml, "<step>{}</step>", details.letter);
                    if details.alter != 0 {
                        let _ = write!(xml, "<alter>{}</alter>", details.alter);
                    }
                    let _ = write!(xml, "<octave>{}</octave>", details.octave);
                    xml.push_str("</pitch>");
                }
                None => xml.push_str("<rest/>"),
            }
            let _ = write!(
                xml,
                "<duration>{}</duration><voice>{}</voice><type>{}</type><staff>{}</staff>",
                event.duration_ticks,
                event.voice,
                event.duration_type.name(),
                staff_number
            );
            xml.push_str("</note>\n");
        }
    }

    xml.push_str("    </measure>\n");
}
