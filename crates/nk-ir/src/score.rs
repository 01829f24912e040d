//! Score notes, parts and arrangements.
//!
//! Scores are plain borrowed slices of [`ScoreNote`]. The playback engine
//! never copies or frees them; the caller keeps ownership.

use arrayvec::ArrayVec;

use crate::note_length::NoteLength;
use crate::pitch::{Octave, PitchClass};

/// Maximum number of output channels (and therefore parts) per arrangement.
pub const MAX_CHANNELS: usize = 10;

/// One element of a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScoreNote {
    pub pitch: PitchClass,
    pub octave: Octave,
    pub length: NoteLength,
}

impl ScoreNote {
    pub const fn new(pitch: PitchClass, octave: Octave, length: NoteLength) -> Self {
        Self { pitch, octave, length }
    }

    /// A rest of the given length. The octave is irrelevant and set to O4.
    pub const fn rest(length: NoteLength) -> Self {
        Self { pitch: PitchClass::Rest, octave: Octave::O4, length }
    }

    pub const fn is_rest(&self) -> bool {
        self.pitch.is_rest()
    }
}

/// A single voice of an arrangement, played on one channel.
#[derive(Clone, Copy, Debug)]
pub struct Part<'a> {
    pub name: &'a str,
    pub notes: &'a [ScoreNote],
    /// Restart from the first note after the last one.
    pub looped: bool,
}

impl<'a> Part<'a> {
    pub const fn new(name: &'a str, notes: &'a [ScoreNote]) -> Self {
        Self { name, notes, looped: false }
    }

    pub const fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    pub const fn len(&self) -> usize {
        self.notes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// A set of parts played together at one tempo.
#[derive(Clone, Debug)]
pub struct Arrangement<'a> {
    pub title: &'a str,
    pub bpm: u16,
    pub parts: ArrayVec<Part<'a>, MAX_CHANNELS>,
}

impl<'a> Arrangement<'a> {
    pub fn new(title: &'a str, bpm: u16) -> Self {
        Self { title, bpm, parts: ArrayVec::new() }
    }

    /// Add a part. Parts beyond [`MAX_CHANNELS`] are ignored.
    pub fn with_part(mut self, part: Part<'a>) -> Self {
        let _ = self.parts.try_push(part);
        self
    }

    /// Total number of notes across all parts.
    pub fn note_count(&self) -> usize {
        self.parts.iter().map(Part::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &[ScoreNote] = &[
        ScoreNote::new(PitchClass::C, Octave::O4, NoteLength::Quarter),
        ScoreNote::rest(NoteLength::Eighth),
    ];

    #[test]
    fn rest_constructor_marks_rest() {
        assert!(ScoreNote::rest(NoteLength::Half).is_rest());
        assert!(!LINE[0].is_rest());
    }

    #[test]
    fn arrangement_ignores_parts_past_capacity() {
        let mut arr = Arrangement::new("full", 120);
        for _ in 0..MAX_CHANNELS + 3 {
            arr = arr.with_part(Part::new("p", LINE));
        }
        assert_eq!(arr.parts.len(), MAX_CHANNELS);
        assert_eq!(arr.note_count(), MAX_CHANNELS * 2);
    }

    #[test]
    fn looped_builder_sets_flag() {
        let part = Part::new("bass", LINE).looped();
        assert!(part.looped);
        assert_eq!(part.len(), 2);
    }
}
