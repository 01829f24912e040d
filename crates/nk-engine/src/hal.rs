//! Hardware seams: a PWM timer channel and a millisecond clock.
//!
//! Methods take `&self` because the underlying registers are memory-mapped
//! and written in place; this lets the tick path and the poll path share a
//! channel without a lock.

/// One PWM output channel of a hardware timer.
pub trait PwmChannel {
    /// Current prescaler register value (counter clock = input clock / (prescaler + 1)).
    fn prescaler(&self) -> u32;

    /// Write the auto-reload (period) register.
    fn set_period(&self, reload: u32);

    /// Write the capture/compare (duty) register. 0 silences the output.
    fn set_duty(&self, compare: u32);

    /// Force an update event so new period/duty values latch immediately.
    fn generate_update(&self);

    /// Enable PWM output on this channel.
    fn start(&self);
}

/// Free-running millisecond tick counter. Wraps at `u32::MAX`.
pub trait Clock {
    fn now(&self) -> u32;
}

impl<P: PwmChannel + ?Sized> PwmChannel for &P {
    fn prescaler(&self) -> u32 {
        (**self).prescaler()
    }

    fn set_period(&self, reload: u32) {
        (**self).set_period(reload)
    }

    fn set_duty(&self, compare: u32) {
        (**self).set_duty(compare)
    }

    fn generate_update(&self) {
        (**self).generate_update()
    }

    fn start(&self) {
        (**self).start()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u32 {
        (**self).now()
    }
}

/// Per-channel timer parameters supplied at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Timer input clock in Hz.
    pub clock_hz: u32,
    /// Largest value the auto-reload register can hold.
    pub max_reload: u32,
}

impl ChannelConfig {
    /// 16-bit timer counter.
    pub const MAX_RELOAD_16: u32 = 0xFFFF;

    pub const fn new(clock_hz: u32) -> Self {
        Self { clock_hz, max_reload: Self::MAX_RELOAD_16 }
    }

    /// Same clock with a wider counter (e.g. a 32-bit general-purpose timer).
    pub const fn with_max_reload(mut self, max_reload: u32) -> Self {
        self.max_reload = max_reload;
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}
