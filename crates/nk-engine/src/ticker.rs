//! Tick handler: auto-stop for sounding notes.

use crate::hal::{Clock, PwmChannel};
use crate::voice::Voice;

/// The tick-path capability. It can only end notes whose time is up.
///
/// Call [`Ticker::tick`] from the periodic timer interrupt (nominally every
/// millisecond). The work is O(channels) and never allocates.
pub struct Ticker<'e, P, C> {
    voices: &'e [Voice<P>],
    clock: &'e C,
}

impl<'e, P, C> Ticker<'e, P, C> {
    pub(crate) fn new(voices: &'e [Voice<P>], clock: &'e C) -> Self {
        Self { voices, clock }
    }
}

impl<P, C> Clone for Ticker<'_, P, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C> Copy for Ticker<'_, P, C> {}

impl<P: PwmChannel, C: Clock> Ticker<'_, P, C> {
    /// Silence every voice whose stop time has been reached.
    pub fn tick(&self) {
        let now = self.clock.now();
        for voice in self.voices {
            voice.expire(now);
        }
    }

    pub fn channel_count(&self) -> usize {
        self.voices.len()
    }
}
