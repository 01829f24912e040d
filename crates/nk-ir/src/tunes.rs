//! Bundled arrangements.

use crate::note_length::NoteLength::{self, *};
use crate::pitch::Octave::{self, *};
use crate::pitch::PitchClass::{self, *};
use crate::score::{Arrangement, Part, ScoreNote};

const fn n(pitch: PitchClass, octave: Octave, length: NoteLength) -> ScoreNote {
    ScoreNote::new(pitch, octave, length)
}

const fn r(length: NoteLength) -> ScoreNote {
    ScoreNote::rest(length)
}

/// Beethoven, Symphony No. 9, "Ode to Joy" theme.
pub const ODE_TO_JOY_MELODY: &[ScoreNote] = &[
    n(E, O5, Quarter), n(E, O5, Quarter), n(F, O5, Quarter), n(G, O5, Quarter),
    n(G, O5, Quarter), n(F, O5, Quarter), n(E, O5, Quarter), n(D, O5, Quarter),
    n(C, O5, Quarter), n(C, O5, Quarter), n(D, O5, Quarter), n(E, O5, Quarter),
    n(E, O5, DottedQuarter), n(D, O5, Eighth), n(D, O5, Half),
    n(E, O5, Quarter), n(E, O5, Quarter), n(F, O5, Quarter), n(G, O5, Quarter),
    n(G, O5, Quarter), n(F, O5, Quarter), n(E, O5, Quarter), n(D, O5, Quarter),
    n(C, O5, Quarter), n(C, O5, Quarter), n(D, O5, Quarter), n(E, O5, Quarter),
    n(D, O5, DottedQuarter), n(C, O5, Eighth), n(C, O5, Half),
];

pub const ODE_TO_JOY_BASS: &[ScoreNote] = &[
    n(C, O3, Half), n(G, O3, Half),
    n(C, O3, Half), n(G, O2, Half),
    n(A, O2, Half), n(F, O2, Half),
    n(G, O2, Half), n(G, O2, Quarter), r(Quarter),
    n(C, O3, Half), n(G, O3, Half),
    n(C, O3, Half), n(G, O2, Half),
    n(A, O2, Half), n(F, O2, Half),
    n(G, O2, Half), n(C, O3, Quarter), r(Quarter),
];

/// Short brass-style fanfare built on triplets and rests.
pub const FANFARE_LEAD: &[ScoreNote] = &[
    n(G, O4, EighthTriplet), n(G, O4, EighthTriplet), n(G, O4, EighthTriplet),
    n(C, O5, DottedQuarter), r(Eighth),
    n(G, O4, EighthTriplet), n(C, O5, EighthTriplet), n(E, O5, EighthTriplet),
    n(G, O5, Half),
    n(E, O5, QuarterTriplet), n(C, O5, QuarterTriplet), n(E, O5, QuarterTriplet),
    n(G, O5, DottedHalf), r(Quarter),
];

pub const FANFARE_DRONE: &[ScoreNote] = &[
    n(C, O3, Whole),
    n(G, O2, Half), n(C, O3, Half),
    n(C, O3, DottedHalf), r(Quarter),
];

/// Four-bar ostinato meant to loop under a lead line.
pub const ARPEGGIO_LOOP: &[ScoreNote] = &[
    n(C, O4, Sixteenth), n(E, O4, Sixteenth), n(G, O4, Sixteenth), n(C, O5, Sixteenth),
    n(A, O3, Sixteenth), n(C, O4, Sixteenth), n(E, O4, Sixteenth), n(A, O4, Sixteenth),
    n(F, O3, Sixteenth), n(A, O3, Sixteenth), n(C, O4, Sixteenth), n(F, O4, Sixteenth),
    n(G, O3, Sixteenth), n(B, O3, Sixteenth), n(D, O4, Sixteenth), n(G, O4, Sixteenth),
];

pub fn ode_to_joy() -> Arrangement<'static> {
    Arrangement::new("Ode to Joy", 120)
        .with_part(Part::new("melody", ODE_TO_JOY_MELODY))
        .with_part(Part::new("bass", ODE_TO_JOY_BASS))
}

pub fn fanfare() -> Arrangement<'static> {
    Arrangement::new("Fanfare", 96)
        .with_part(Part::new("lead", FANFARE_LEAD))
        .with_part(Part::new("drone", FANFARE_DRONE))
}

/// A looping arpeggio. Never finishes on its own.
pub fn arpeggio() -> Arrangement<'static> {
    Arrangement::new("Arpeggio", 140).with_part(Part::new("arp", ARPEGGIO_LOOP).looped())
}

/// Look up a bundled arrangement by its command-line name.
pub fn by_name(name: &str) -> Option<Arrangement<'static>> {
    match name {
        "ode" | "ode-to-joy" => Some(ode_to_joy()),
        "fanfare" => Some(fanfare()),
        "arpeggio" => Some(arpeggio()),
        _ => None,
    }
}

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["ode-to-joy", "fanfare", "arpeggio"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in NAMES {
            assert!(by_name(name).is_some(), "{} did not resolve", name);
        }
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn ode_to_joy_has_two_parts() {
        let arr = ode_to_joy();
        assert_eq!(arr.parts.len(), 2);
        assert_eq!(arr.bpm, 120);
        assert!(arr.parts.iter().all(|p| !p.looped));
    }

    #[test]
    fn fanfare_uses_rests() {
        assert!(FANFARE_LEAD.iter().any(ScoreNote::is_rest));
    }
}
