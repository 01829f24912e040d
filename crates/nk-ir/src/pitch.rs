//! Pitch classes and octaves.

/// One of the twelve equal-tempered pitch classes, or a rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
    /// No tone. Occupies time without producing sound.
    Rest,
}

impl PitchClass {
    /// Number of sounding pitch classes (Rest excluded).
    pub const COUNT: usize = 12;

    /// All sounding pitch classes in semitone order.
    pub const TONES: [PitchClass; Self::COUNT] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Semitones above C within the octave. `None` for a rest.
    pub const fn semitone(self) -> Option<u8> {
        match self {
            PitchClass::C => Some(0),
            PitchClass::Cs => Some(1),
            PitchClass::D => Some(2),
            PitchClass::Ds => Some(3),
            PitchClass::E => Some(4),
            PitchClass::F => Some(5),
            PitchClass::Fs => Some(6),
            PitchClass::G => Some(7),
            PitchClass::Gs => Some(8),
            PitchClass::A => Some(9),
            PitchClass::As => Some(10),
            PitchClass::B => Some(11),
            PitchClass::Rest => None,
        }
    }

    pub const fn is_rest(self) -> bool {
        matches!(self, PitchClass::Rest)
    }

    /// Display name, e.g. `"C#"`.
    pub const fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
            PitchClass::Rest => "-",
        }
    }
}

/// Octave 1 through 7 (scientific pitch notation, A4 = 440 Hz).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Octave {
    O1,
    O2,
    O3,
    O4,
    O5,
    O6,
    O7,
}

impl Octave {
    pub const COUNT: usize = 7;

    pub const ALL: [Octave; Self::COUNT] = [
        Octave::O1,
        Octave::O2,
        Octave::O3,
        Octave::O4,
        Octave::O5,
        Octave::O6,
        Octave::O7,
    ];

    /// Zero-based table index (O1 = 0).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Musical octave number (O1 = 1).
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Look up an octave by its musical number. Out-of-range numbers yield `None`.
    pub const fn from_number(number: u8) -> Option<Octave> {
        match number {
            1 => Some(Octave::O1),
            2 => Some(Octave::O2),
            3 => Some(Octave::O3),
            4 => Some(Octave::O4),
            5 => Some(Octave::O5),
            6 => Some(Octave::O6),
            7 => Some(Octave::O7),
            _ => None,
        }
    }

    /// The next octave up, if any.
    pub const fn up(self) -> Option<Octave> {
        Self::from_number(self.number() + 1)
    }
}

/// MIDI note number for a pitch class in an octave (C-1 = 0, A4 = 69).
/// `None` for a rest.
pub fn midi_note(pitch: PitchClass, octave: Octave) -> Option<u8> {
    let semitone = pitch.semitone()?;
    Some((octave.number() + 1) * 12 + semitone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_midi_69() {
        assert_eq!(midi_note(PitchClass::A, Octave::O4), Some(69));
    }

    #[test]
    fn c4_is_midi_60() {
        assert_eq!(midi_note(PitchClass::C, Octave::O4), Some(60));
    }

    #[test]
    fn rest_has_no_midi_note() {
        assert_eq!(midi_note(PitchClass::Rest, Octave::O4), None);
        assert!(PitchClass::Rest.is_rest());
    }

    #[test]
    fn tones_are_one_semitone_apart() {
        for (i, pitch) in PitchClass::TONES.iter().enumerate() {
            assert_eq!(pitch.semitone(), Some(i as u8));
        }
    }

    #[test]
    fn octave_index_and_number() {
        assert_eq!(Octave::O1.index(), 0);
        assert_eq!(Octave::O1.number(), 1);
        assert_eq!(Octave::O7.index(), 6);
        assert_eq!(Octave::from_number(4), Some(Octave::O4));
        assert_eq!(Octave::from_number(0), None);
        assert_eq!(Octave::from_number(8), None);
    }

    #[test]
    fn octave_up_stops_at_seven() {
        assert_eq!(Octave::O3.up(), Some(Octave::O4));
        assert_eq!(Octave::O7.up(), None);
    }
}
