//! Millisecond-stepped playback on simulated hardware.

use nk_audio::{Frame, SimClock, SimPwm, SquareRenderer};
use nk_engine::{score_duration_ms, ChannelConfig, Engine, EngineConfig};
use nk_ir::Arrangement;

/// Timer input clock of the simulated PWM channels (a typical 72 MHz MCU).
pub const TIMER_CLOCK_HZ: u32 = 72_000_000;

/// Prescaler giving a 1 MHz counting rate at [`TIMER_CLOCK_HZ`].
pub const TIMER_PRESCALER: u32 = 71;

/// One engine wired to one simulated PWM channel per part, plus a renderer.
///
/// Each [`Session::step_ms`] mirrors one pass of a firmware main loop
/// followed by one SysTick interrupt.
pub struct Session<'s> {
    engine: Engine<'s, SimPwm, SimClock>,
    renderer: SquareRenderer,
    sample_rate: u32,
    frame_remainder: u32,
    elapsed_ms: u64,
}

impl<'s> Session<'s> {
    pub fn new(arrangement: &Arrangement<'s>, sample_rate: u32) -> Self {
        Self::with_clock(arrangement, sample_rate, SimClock::new())
    }

    /// Start the tick counter at `ms` instead of 0.
    pub fn starting_at(arrangement: &Arrangement<'s>, sample_rate: u32, ms: u32) -> Self {
        Self::with_clock(arrangement, sample_rate, SimClock::starting_at(ms))
    }

    fn with_clock(arrangement: &Arrangement<'s>, sample_rate: u32, clock: SimClock) -> Self {
        let config = EngineConfig { initial_bpm: arrangement.bpm, ..EngineConfig::default() };
        let mut engine: Engine<'s, SimPwm, SimClock> = Engine::new(clock, config);
        for _ in &arrangement.parts {
            engine.register_channel(
                SimPwm::new(TIMER_CLOCK_HZ, TIMER_PRESCALER),
                ChannelConfig::new(TIMER_CLOCK_HZ),
            );
        }
        engine.play_arrangement(arrangement);

        Self {
            engine,
            renderer: SquareRenderer::new(sample_rate),
            sample_rate,
            frame_remainder: 0,
            elapsed_ms: 0,
        }
    }

    pub fn engine(&self) -> &Engine<'s, SimPwm, SimClock> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<'s, SimPwm, SimClock> {
        &mut self.engine
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Run the sequencer, render one millisecond of audio, then tick.
    pub fn step_ms(&mut self, mut emit: impl FnMut(Frame)) {
        self.engine.update();

        self.frame_remainder += self.sample_rate;
        let count = self.frame_remainder / 1000;
        self.frame_remainder %= 1000;

        let channels = self.engine.channel_count();
        for _ in 0..count {
            let pwms = (0..channels).filter_map(|ch| self.engine.pwm(ch));
            emit(self.renderer.render_frame(pwms));
        }

        self.engine.clock().advance(1);
        self.engine.tick();
        self.elapsed_ms += 1;
    }

    /// Step until every part has finished or `max_ms` have elapsed.
    pub fn run(&mut self, max_ms: u64, mut emit: impl FnMut(Frame)) {
        while !self.is_finished() && self.elapsed_ms < max_ms {
            self.step_ms(&mut emit);
        }
    }
}

/// Length of the longest non-looping part, or `None` if any part loops.
pub fn arrangement_duration_ms(arrangement: &Arrangement<'_>) -> Option<u64> {
    if arrangement.parts.iter().any(|p| p.looped) {
        return None;
    }
    arrangement
        .parts
        .iter()
        .map(|p| score_duration_ms(p.notes, arrangement.bpm))
        .max()
}
