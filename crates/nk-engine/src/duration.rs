//! Tempo-relative note durations.

use nk_ir::{NoteLength, ScoreNote};

/// Shortest duration ever scheduled for a positive note length.
pub const MINIMUM_AUDIBLE_MS: u32 = 10;

/// Tempo used until `set_tempo` is called.
pub const DEFAULT_BPM: u16 = 120;

/// Milliseconds for `length` at `bpm` beats (quarter notes) per minute.
///
/// The multiplier chain runs in floating point and truncates. A positive
/// result that truncates to 0 is raised to [`MINIMUM_AUDIBLE_MS`]. A tempo
/// of 0 is treated as 1 BPM.
pub fn note_length_to_ms(length: NoteLength, bpm: u16) -> u32 {
    let quarter_ms = 60_000.0f32 / bpm.max(1) as f32;
    let (num, den) = length.beats();
    let ms = quarter_ms * num as f32 / den as f32;

    let truncated = ms as u32;
    if truncated == 0 && ms > 0.0 {
        MINIMUM_AUDIBLE_MS
    } else {
        truncated
    }
}

/// Duration for a packed length code. Unknown codes yield 0, which the
/// sequencer treats as "advance immediately".
pub fn code_to_ms(code: u8, bpm: u16) -> u32 {
    NoteLength::from_code(code).map_or(0, |length| note_length_to_ms(length, bpm))
}

/// Time taken by one pass through `notes` at `bpm`.
pub fn score_duration_ms(notes: &[ScoreNote], bpm: u16) -> u64 {
    notes
        .iter()
        .map(|note| note_length_to_ms(note.length, bpm) as u64)
        .sum()
}
