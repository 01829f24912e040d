//! Simulated timer hardware.
//!
//! Stands in for a microcontroller's PWM timer channel and SysTick counter
//! so the engine can run on a desktop. Registers are atomics, so the tick
//! path may run on another thread than the sequencer.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use nk_engine::{effective_frequency, Clock, PwmChannel};

/// One PWM channel of a simulated timer.
#[derive(Debug)]
pub struct SimPwm {
    clock_hz: u32,
    prescaler: AtomicU32,
    reload: AtomicU32,
    compare: AtomicU32,
    enabled: AtomicBool,
    updates: AtomicU32,
}

impl SimPwm {
    pub fn new(clock_hz: u32, prescaler: u32) -> Self {
        Self {
            clock_hz,
            prescaler: AtomicU32::new(prescaler),
            reload: AtomicU32::new(0xFFFF),
            compare: AtomicU32::new(0),
            enabled: AtomicBool::new(false),
            updates: AtomicU32::new(0),
        }
    }

    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn set_prescaler(&self, prescaler: u32) {
        self.prescaler.store(prescaler, Ordering::Relaxed);
    }

    pub fn reload(&self) -> u32 {
        self.reload.load(Ordering::Relaxed)
    }

    pub fn compare(&self) -> u32 {
        self.compare.load(Ordering::Relaxed)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Number of forced update events, i.e. tones programmed.
    pub fn update_count(&self) -> u32 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Output frequency implied by the current registers.
    pub fn frequency_hz(&self) -> f32 {
        effective_frequency(self.clock_hz, self.prescaler(), self.reload())
    }

    /// High fraction of the period, 0.0 (silent) to 1.0.
    pub fn duty(&self) -> f32 {
        if !self.is_enabled() {
            return 0.0;
        }
        let period = self.reload() as f32 + 1.0;
        (self.compare() as f32 / period).min(1.0)
    }

    pub fn is_sounding(&self) -> bool {
        self.is_enabled() && self.compare() > 0
    }
}

impl PwmChannel for SimPwm {
    fn prescaler(&self) -> u32 {
        self.prescaler.load(Ordering::Relaxed)
    }

    fn set_period(&self, reload: u32) {
        self.reload.store(reload, Ordering::Relaxed);
    }

    fn set_duty(&self, compare: u32) {
        self.compare.store(compare, Ordering::Relaxed);
    }

    fn generate_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    fn start(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }
}

/// Free-running millisecond counter advanced by the host.
#[derive(Debug, Default)]
pub struct SimClock {
    ms: AtomicU32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start somewhere other than 0, e.g. just before the counter wraps.
    pub fn starting_at(ms: u32) -> Self {
        Self { ms: AtomicU32::new(ms) }
    }

    /// Advance by `ms`, wrapping like a hardware counter.
    pub fn advance(&self, ms: u32) {
        self.ms.fetch_add(ms, Ordering::Relaxed);
    }
}

impl Clock for SimClock {
    fn now(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_round_trip_through_trait() {
        let pwm = SimPwm::new(1_000_000, 0);
        assert!(!pwm.is_sounding());
        pwm.start();
        pwm.set_period(999);
        pwm.set_duty(499);
        pwm.generate_update();

        assert!(pwm.is_sounding());
        assert_eq!(pwm.update_count(), 1);
        assert!((pwm.frequency_hz() - 1000.0).abs() < 0.01);
        assert!((pwm.duty() - 0.499).abs() < 0.001);
    }

    #[test]
    fn disabled_channel_has_no_duty() {
        let pwm = SimPwm::new(1_000_000, 0);
        pwm.set_duty(100);
        assert_eq!(pwm.duty(), 0.0);
    }

    #[test]
    fn clock_wraps() {
        let clock = SimClock::starting_at(u32::MAX);
        clock.advance(2);
        assert_eq!(clock.now(), 1);
    }
}
