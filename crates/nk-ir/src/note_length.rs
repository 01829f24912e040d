//! Symbolic note lengths.
//!
//! Every length is a fixed rational multiple of a quarter note, so the
//! duration model never branches on floating-point constants.

/// A closed set of note-length symbols: six base lengths plus a dotted
/// (×3/2) and a triplet (×2/3) variant of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteLength {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,

    DottedWhole,
    DottedHalf,
    DottedQuarter,
    DottedEighth,
    DottedSixteenth,
    DottedThirtySecond,

    WholeTriplet,
    HalfTriplet,
    QuarterTriplet,
    EighthTriplet,
    SixteenthTriplet,
    ThirtySecondTriplet,
}

impl NoteLength {
    pub const COUNT: usize = 18;

    /// Length in quarter-note beats as `(numerator, denominator)`.
    ///
    /// A triplet is two thirds of its base value: three quarter-triplets
    /// fill one half note.
    pub const fn beats(self) -> (u32, u32) {
        match self {
            NoteLength::Whole => (4, 1),
            NoteLength::Half => (2, 1),
            NoteLength::Quarter => (1, 1),
            NoteLength::Eighth => (1, 2),
            NoteLength::Sixteenth => (1, 4),
            NoteLength::ThirtySecond => (1, 8),

            NoteLength::DottedWhole => (6, 1),
            NoteLength::DottedHalf => (3, 1),
            NoteLength::DottedQuarter => (3, 2),
            NoteLength::DottedEighth => (3, 4),
            NoteLength::DottedSixteenth => (3, 8),
            NoteLength::DottedThirtySecond => (3, 16),

            NoteLength::WholeTriplet => (8, 3),
            NoteLength::HalfTriplet => (4, 3),
            NoteLength::QuarterTriplet => (2, 3),
            NoteLength::EighthTriplet => (1, 3),
            NoteLength::SixteenthTriplet => (1, 6),
            NoteLength::ThirtySecondTriplet => (1, 12),
        }
    }

    /// Decode a packed length code (the declaration order above).
    pub const fn from_code(code: u8) -> Option<NoteLength> {
        let length = match code {
            0 => NoteLength::Whole,
            1 => NoteLength::Half,
            2 => NoteLength::Quarter,
            3 => NoteLength::Eighth,
            4 => NoteLength::Sixteenth,
            5 => NoteLength::ThirtySecond,
            6 => NoteLength::DottedWhole,
            7 => NoteLength::DottedHalf,
            8 => NoteLength::DottedQuarter,
            9 => NoteLength::DottedEighth,
            10 => NoteLength::DottedSixteenth,
            11 => NoteLength::DottedThirtySecond,
            12 => NoteLength::WholeTriplet,
            13 => NoteLength::HalfTriplet,
            14 => NoteLength::QuarterTriplet,
            15 => NoteLength::EighthTriplet,
            16 => NoteLength::SixteenthTriplet,
            17 => NoteLength::ThirtySecondTriplet,
            _ => return None,
        };
        Some(length)
    }

    /// Packed code for this length.
    pub const fn code(self) -> u8 {
        self as u8
    }
}
