//! Score types for the notekit buzzer sequencer.
//!
//! This crate defines the musical vocabulary shared by the playback engine
//! and its hosts: pitch classes, octaves, symbolic note lengths and the
//! immutable scores built from them.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod note_length;
mod pitch;
mod score;
pub mod tunes;

pub use note_length::NoteLength;
pub use pitch::{midi_note, Octave, PitchClass};
pub use score::{Arrangement, Part, ScoreNote, MAX_CHANNELS};
