//! Sequencer: pulls the next note for every idle channel.

use log::{debug, trace};
use nk_ir::ScoreNote;

use crate::channel::{ChannelState, Step};
use crate::duration::note_length_to_ms;
use crate::frequency::FrequencyTable;
use crate::hal::{Clock, PwmChannel};
use crate::voice::Voice;

/// The poll-path capability: advances scores and programs voices.
///
/// Runs from the main loop, never from the tick interrupt. Every write to a
/// voice first marks it idle, so a [`Ticker`] that interrupts the write
/// leaves it alone; only the final arm hands the voice back to the ticker.
///
/// [`Ticker`]: crate::Ticker
pub struct Sequencer<'e, 's, P, C> {
    pub(crate) voices: &'e [Voice<P>],
    pub(crate) channels: &'e mut [ChannelState<'s>],
    pub(crate) table: &'e FrequencyTable,
    pub(crate) tempo: &'e mut u16,
    pub(crate) clock: &'e C,
}

impl<'s, P: PwmChannel, C: Clock> Sequencer<'_, 's, P, C> {
    /// Dispatch the next note on every active channel whose previous note
    /// (or rest) has fully elapsed.
    pub fn update(&mut self) {
        for (ch, (voice, state)) in self.voices.iter().zip(self.channels.iter_mut()).enumerate() {
            if !state.is_active() || voice.is_playing() {
                continue;
            }
            match state.step() {
                Step::Note(note) => {
                    let (hz, ms) = resolve(self.table, &note, *self.tempo);
                    trace!("ch{} #{} {:?} -> {} Hz for {} ms", ch, state.index() - 1, note, hz, ms);
                    voice.emit(hz, ms, self.clock.now());
                }
                Step::Rewind => debug!("ch{} looping", ch),
                Step::Finished => debug!("ch{} finished", ch),
                Step::Idle => {}
            }
        }
    }

    /// Assign a score to a channel, restarting it from the first note.
    /// Unknown channels are ignored.
    pub fn set_part(&mut self, ch: usize, score: &'s [ScoreNote], looped: bool) {
        if let Some(state) = self.channels.get_mut(ch) {
            state.assign(score, looped);
            debug!("ch{} assigned {} notes (loop: {})", ch, score.len(), looped);
        }
    }

    /// Stop dispatching on a channel and silence it.
    pub fn clear_part(&mut self, ch: usize) {
        if let (Some(state), Some(voice)) = (self.channels.get_mut(ch), self.voices.get(ch)) {
            state.deactivate();
            voice.silence();
        }
    }

    /// Play a raw tone, bypassing the score. `frequency_hz == 0` rests,
    /// `duration_ms == 0` sustains until silenced.
    pub fn note_on(&mut self, ch: usize, frequency_hz: u32, duration_ms: u32) {
        if let Some(voice) = self.voices.get(ch) {
            voice.emit(frequency_hz, duration_ms, self.clock.now());
        }
    }

    /// Silence a channel now. Its score (if active) resumes on the next update.
    pub fn silence(&mut self, ch: usize) {
        if let Some(voice) = self.voices.get(ch) {
            voice.silence();
        }
    }

    /// Change the tempo for notes dispatched from now on. 0 is raised to 1.
    pub fn set_tempo(&mut self, bpm: u16) {
        *self.tempo = bpm.max(1);
    }

    pub fn tempo(&self) -> u16 {
        *self.tempo
    }
}

/// Frequency (0 for a rest) and duration of a score note.
fn resolve(table: &FrequencyTable, note: &ScoreNote, bpm: u16) -> (u32, u32) {
    let hz = if note.is_rest() { 0 } else { table.hz(note.pitch, note.octave) };
    (hz, note_length_to_ms(note.length, bpm))
}
