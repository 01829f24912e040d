//! Per-channel output state and the note emitter.
//!
//! A [`Voice`] is the part of a channel that both execution contexts see:
//! the PWM hardware, the "playing" flag and the scheduled stop time. The
//! tick path only ever clears the flag and zeroes the duty register; every
//! other write happens on the poll path while the flag is clear.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::hal::{ChannelConfig, PwmChannel};

/// Auto-reload value giving a PWM period of `1 / frequency_hz` seconds.
///
/// `reload = clock / (prescaler + 1) / frequency - 1`, clamped to
/// `max_reload`. Frequencies too low for the counter width come out higher
/// than requested; frequencies above the counting rate give 0.
pub fn compute_reload(clock_hz: u32, prescaler: u32, frequency_hz: u32, max_reload: u32) -> u32 {
    let counts = clock_hz as u64 / (prescaler as u64 + 1) / frequency_hz.max(1) as u64;
    counts.saturating_sub(1).min(max_reload as u64) as u32
}

/// Output frequency actually produced by a reload value.
pub fn effective_frequency(clock_hz: u32, prescaler: u32, reload: u32) -> f32 {
    clock_hz as f32 / (prescaler as f32 + 1.0) / (reload as f32 + 1.0)
}

/// Wraparound-safe "has `now` reached `deadline`" for a wrapping u32 counter.
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    now.wrapping_sub(deadline) as i32 >= 0
}

/// Hardware channel plus its auto-stop state.
pub struct Voice<P> {
    pwm: P,
    config: ChannelConfig,
    playing: AtomicBool,
    stop_at: AtomicU32,
}

impl<P: PwmChannel> Voice<P> {
    /// Take over a PWM channel and start its output (silent until the first note).
    pub fn new(pwm: P, config: ChannelConfig) -> Self {
        pwm.set_duty(0);
        pwm.start();
        Self {
            pwm,
            config,
            playing: AtomicBool::new(false),
            stop_at: AtomicU32::new(0),
        }
    }

    /// A tone or rest is sounding and waiting for auto-stop.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Tick count at which the current note ends. Meaningful only while playing.
    pub fn stop_at(&self) -> u32 {
        self.stop_at.load(Ordering::Relaxed)
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    pub fn config(&self) -> ChannelConfig {
        self.config
    }

    /// Program the timer for `frequency_hz` and arm auto-stop after `duration_ms`.
    ///
    /// - `frequency_hz == 0` is a rest: duty goes to 0 but the voice still
    ///   counts as playing until the rest has elapsed.
    /// - `duration_ms == 0` on a tone sustains it until stopped explicitly.
    ///
    /// The voice is marked idle before any register is touched, so a tick
    /// landing mid-write cannot expire the previous note over the new one.
    pub fn emit(&self, frequency_hz: u32, duration_ms: u32, now: u32) {
        self.playing.store(false, Ordering::Release);

        if frequency_hz == 0 {
            self.pwm.set_duty(0);
            self.arm(now, duration_ms);
            return;
        }

        let reload = compute_reload(
            self.config.clock_hz,
            self.pwm.prescaler(),
            frequency_hz,
            self.config.max_reload,
        );
        self.pwm.set_period(reload);
        self.pwm.set_duty(reload / 2);
        self.pwm.generate_update();

        if duration_ms > 0 {
            self.arm(now, duration_ms);
        }
    }

    fn arm(&self, now: u32, duration_ms: u32) {
        self.stop_at.store(now.wrapping_add(duration_ms), Ordering::Relaxed);
        self.playing.store(true, Ordering::Release);
    }

    /// Tick path: silence the output if its stop time has passed.
    /// Returns true when the voice went idle on this call.
    pub(crate) fn expire(&self, now: u32) -> bool {
        if !self.is_playing() || !deadline_reached(now, self.stop_at()) {
            return false;
        }
        self.pwm.set_duty(0);
        self.playing.store(false, Ordering::Release);
        true
    }

    /// Silence immediately and drop any pending auto-stop.
    pub(crate) fn silence(&self) {
        self.pwm.set_duty(0);
        self.playing.store(false, Ordering::Release);
    }
}
