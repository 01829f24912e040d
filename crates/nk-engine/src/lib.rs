//! Note playback engine for PWM buzzer channels.
//!
//! Turns scores into timer reconfigurations: a frequency table and a
//! tempo-relative duration model feed a per-channel sequencer, and a
//! millisecond tick handler silences each note when its time is up.
//!
//! Allocation-free and `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod channel;
mod duration;
mod engine;
mod frequency;
mod hal;
mod sequencer;
mod ticker;
mod voice;

#[cfg(test)]
mod testing;

pub use channel::{ChannelState, Step};
pub use duration::{code_to_ms, note_length_to_ms, score_duration_ms, DEFAULT_BPM, MINIMUM_AUDIBLE_MS};
pub use engine::{ChannelStatus, Engine, EngineConfig};
pub use frequency::{FrequencyTable, DEFAULT_REFERENCE_HZ};
pub use hal::{ChannelConfig, Clock, PwmChannel};
pub use sequencer::Sequencer;
pub use ticker::Ticker;
pub use voice::{compute_reload, deadline_reached, effective_frequency, Voice};
