//! Square-wave rendering of PWM register state.

use crate::frame::Frame;
use crate::sim::SimPwm;

/// Default per-channel amplitude, leaving headroom for ten channels.
pub const DEFAULT_AMPLITUDE: i16 = 3000;

/// Turns the registers of a set of simulated PWM channels into PCM.
///
/// Keeps one phase accumulator per channel so waveforms stay continuous
/// across calls and across frequency changes.
pub struct SquareRenderer {
    sample_rate: u32,
    amplitude: i16,
    phases: Vec<f32>,
}

impl SquareRenderer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            amplitude: DEFAULT_AMPLITUDE,
            phases: Vec::new(),
        }
    }

    pub fn with_amplitude(mut self, amplitude: i16) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render one frame from the current register state.
    pub fn render_frame<'a>(&mut self, pwms: impl IntoIterator<Item = &'a SimPwm>) -> Frame {
        let mut out = Frame::silence();
        for (i, pwm) in pwms.into_iter().enumerate() {
            if i >= self.phases.len() {
                self.phases.resize(i + 1, 0.0);
            }
            if !pwm.is_sounding() || self.sample_rate == 0 {
                continue;
            }
            let phase = &mut self.phases[i];
            *phase += pwm.frequency_hz() / self.sample_rate as f32;
            *phase -= phase.floor();
            let level = if *phase < pwm.duty() { self.amplitude } else { -self.amplitude };
            out.mix(Frame::mono(level));
        }
        out
    }

    /// Render `count` frames without any register changes in between.
    pub fn render_frames(&mut self, pwms: &[SimPwm], count: usize, out: &mut Vec<Frame>) {
        for _ in 0..count {
            let frame = self.render_frame(pwms);
            out.push(frame);
        }
    }
}
