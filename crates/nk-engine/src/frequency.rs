//! Equal-tempered frequency table.
//!
//! Maps every (pitch class, octave) pair to a frequency in Hz, anchored at
//! A4. Built once and read-only afterwards; rebuilt only when the reference
//! pitch changes.

use nk_ir::{midi_note, Octave, PitchClass};

/// Concert pitch for A4.
pub const DEFAULT_REFERENCE_HZ: f32 = 440.0;

/// MIDI note number of the reference pitch (A4).
const REFERENCE_NOTE: i32 = 69;

/// Frequencies for all sounding pitch classes across all octaves.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTable {
    reference_hz: f32,
    hz: [[f32; Octave::COUNT]; PitchClass::COUNT],
}

impl FrequencyTable {
    /// Build a table anchored at A4 = `reference_hz`.
    pub fn new(reference_hz: f32) -> Self {
        let mut table = Self {
            reference_hz,
            hz: [[0.0; Octave::COUNT]; PitchClass::COUNT],
        };
        table.rebuild(reference_hz);
        table
    }

    /// Refill every cell for a new reference pitch. Idempotent.
    pub fn rebuild(&mut self, reference_hz: f32) {
        self.reference_hz = reference_hz;
        for pitch in PitchClass::TONES {
            for octave in Octave::ALL {
                self.hz[pitch_index(pitch)][octave.index()] = equal_tempered(pitch, octave, reference_hz);
            }
        }
    }

    /// Frequency of `pitch` in `octave`. `None` for a rest.
    pub fn get(&self, pitch: PitchClass, octave: Octave) -> Option<f32> {
        pitch.semitone().map(|s| self.hz[s as usize][octave.index()])
    }

    /// Frequency truncated to whole Hz for the PWM programmer. Rests map to 0.
    pub fn hz(&self, pitch: PitchClass, octave: Octave) -> u32 {
        self.get(pitch, octave).map_or(0, |f| f as u32)
    }

    pub fn reference_hz(&self) -> f32 {
        self.reference_hz
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_HZ)
    }
}

fn pitch_index(pitch: PitchClass) -> usize {
    pitch.semitone().unwrap_or(0) as usize
}

/// 12-TET: reference * 2^(distance / 12).
fn equal_tempered(pitch: PitchClass, octave: Octave, reference_hz: f32) -> f32 {
    let Some(note) = midi_note(pitch, octave) else {
        return 0.0;
    };
    let distance = note as i32 - REFERENCE_NOTE;
    (reference_hz as f64 * libm::pow(2.0, distance as f64 / 12.0)) as f32
}
