//! The playback context.

use heapless::Vec;
use log::info;
use nk_ir::{Arrangement, ScoreNote, MAX_CHANNELS};

use crate::channel::ChannelState;
use crate::duration::DEFAULT_BPM;
use crate::frequency::{FrequencyTable, DEFAULT_REFERENCE_HZ};
use crate::hal::{ChannelConfig, Clock, PwmChannel};
use crate::sequencer::Sequencer;
use crate::ticker::Ticker;
use crate::voice::Voice;

/// Construction-time engine settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Frequency of A4 in Hz.
    pub reference_hz: f32,
    /// Tempo until `set_tempo` is called.
    pub initial_bpm: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_hz: DEFAULT_REFERENCE_HZ,
            initial_bpm: DEFAULT_BPM,
        }
    }
}

/// Snapshot of one channel, for inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelStatus {
    pub index: usize,
    pub len: usize,
    pub active: bool,
    pub looped: bool,
    pub playing: bool,
    pub stop_at: u32,
}

/// Owns the clock, the frequency table, the tempo and a fixed arena of up
/// to `N` channels.
///
/// Scores are borrowed for `'s`. Drive it with [`Engine::tick`] from the
/// periodic timer and [`Engine::update`] from the main loop, or hand the two
/// halves from [`Engine::split`] to separate contexts.
pub struct Engine<'s, P, C, const N: usize = MAX_CHANNELS> {
    clock: C,
    table: FrequencyTable,
    tempo: u16,
    voices: Vec<Voice<P>, N>,
    channels: Vec<ChannelState<'s>, N>,
}

impl<'s, P: PwmChannel, C: Clock, const N: usize> Engine<'s, P, C, N> {
    /// Create an engine with no channels. The frequency table is built here.
    pub fn new(clock: C, config: EngineConfig) -> Self {
        Self {
            clock,
            table: FrequencyTable::new(config.reference_hz),
            tempo: config.initial_bpm.max(1),
            voices: Vec::new(),
            channels: Vec::new(),
        }
    }

    /// Take over a PWM channel and start its output. Returns the channel id,
    /// or `None` when all `N` slots are in use.
    pub fn register_channel(&mut self, pwm: P, config: ChannelConfig) -> Option<usize> {
        if self.voices.is_full() {
            return None;
        }
        let ch = self.voices.len();
        self.voices.push(Voice::new(pwm, config)).ok()?;
        self.channels.push(ChannelState::new()).ok()?;
        info!("registered ch{} ({} Hz timer clock)", ch, config.clock_hz);
        Some(ch)
    }

    pub fn channel_count(&self) -> usize {
        self.voices.len()
    }

    pub fn set_part(&mut self, ch: usize, score: &'s [ScoreNote], looped: bool) {
        self.sequencer().set_part(ch, score, looped);
    }

    /// Set the arrangement's tempo and assign part `i` to channel `i`.
    /// Parts without a registered channel are skipped.
    pub fn play_arrangement(&mut self, arrangement: &Arrangement<'s>) {
        info!(
            "playing \"{}\" at {} BPM on {}/{} channels",
            arrangement.title,
            arrangement.bpm,
            arrangement.parts.len().min(self.channel_count()),
            arrangement.parts.len(),
        );
        let mut seq = self.sequencer();
        seq.set_tempo(arrangement.bpm);
        for (ch, part) in arrangement.parts.iter().enumerate() {
            seq.set_part(ch, part.notes, part.looped);
        }
    }

    pub fn clear_part(&mut self, ch: usize) {
        self.sequencer().clear_part(ch);
    }

    pub fn set_tempo(&mut self, bpm: u16) {
        self.sequencer().set_tempo(bpm);
    }

    pub fn tempo(&self) -> u16 {
        self.tempo
    }

    /// Rebuild the frequency table around a new A4.
    pub fn set_reference_pitch(&mut self, reference_hz: f32) {
        self.table.rebuild(reference_hz);
    }

    pub fn frequency_table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn note_on(&mut self, ch: usize, frequency_hz: u32, duration_ms: u32) {
        self.sequencer().note_on(ch, frequency_hz, duration_ms);
    }

    pub fn silence(&mut self, ch: usize) {
        self.sequencer().silence(ch);
    }

    /// Channel is sounding a note or rest with auto-stop pending.
    pub fn is_playing(&self, ch: usize) -> bool {
        self.voices.get(ch).is_some_and(Voice::is_playing)
    }

    /// Channel is still dispatching its score.
    pub fn is_active(&self, ch: usize) -> bool {
        self.channels.get(ch).is_some_and(ChannelState::is_active)
    }

    /// No channel is dispatching or waiting out a note.
    pub fn is_finished(&self) -> bool {
        (0..self.channel_count()).all(|ch| !self.is_active(ch) && !self.is_playing(ch))
    }

    pub fn status(&self, ch: usize) -> Option<ChannelStatus> {
        let voice = self.voices.get(ch)?;
        let state = self.channels.get(ch)?;
        Some(ChannelStatus {
            index: state.index(),
            len: state.len(),
            active: state.is_active(),
            looped: state.is_looped(),
            playing: voice.is_playing(),
            stop_at: voice.stop_at(),
        })
    }

    /// Tick handler. See [`Ticker::tick`].
    pub fn tick(&self) {
        self.ticker().tick();
    }

    /// Sequencer step. See [`Sequencer::update`].
    pub fn update(&mut self) {
        self.sequencer().update();
    }

    pub fn ticker(&self) -> Ticker<'_, P, C> {
        Ticker::new(self.voices.as_slice(), &self.clock)
    }

    pub fn sequencer(&mut self) -> Sequencer<'_, 's, P, C> {
        self.split().1
    }

    /// Borrow the tick-path and poll-path capabilities at the same time.
    pub fn split(&mut self) -> (Ticker<'_, P, C>, Sequencer<'_, 's, P, C>) {
        let Self { clock, table, tempo, voices, channels } = self;
        let voices = voices.as_slice();
        let clock = &*clock;
        let ticker = Ticker::new(voices, clock);
        let sequencer = Sequencer {
            voices,
            channels: channels.as_mut_slice(),
            table,
            tempo,
            clock,
        };
        (ticker, sequencer)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pwm(&self, ch: usize) -> Option<&P> {
        self.voices.get(ch).map(Voice::pwm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, ManualClock, MockPwm};
    use nk_ir::{NoteLength, Octave, Part, PitchClass};

    type TestEngine<'s, 'p> = Engine<'s, &'p MockPwm, &'p ManualClock, 4>;

    const THREE: &[ScoreNote] = &[
        ScoreNote::new(PitchClass::A, Octave::O4, NoteLength::Quarter),
        ScoreNote::new(PitchClass::C, Octave::O5, NoteLength::Eighth),
        ScoreNote::new(PitchClass::E, Octave::O5, NoteLength::Half),
    ];

    fn engine<'s, 'p>(clock: &'p ManualClock, pwms: &'p [MockPwm]) -> TestEngine<'s, 'p> {
        let mut engine = TestEngine::new(clock, EngineConfig::default());
        for pwm in pwms {
            engine.register_channel(pwm, ChannelConfig::new(1_000_000));
        }
        engine
    }

    /// Advance 1 ms at a time, ticking then updating, like the firmware loop.
    fn run(engine: &mut TestEngine<'_, '_>, clock: &ManualClock, ms: u32) {
        for _ in 0..ms {
            clock.advance(1);
            engine.tick();
            engine.update();
        }
    }

    #[test]
    fn calls_before_registration_are_noops() {
        let clock = ManualClock::default();
        let mut engine: TestEngine = Engine::new(&clock, EngineConfig::default());
        engine.tick();
        engine.update();
        engine.set_part(0, THREE, false);
        engine.note_on(3, 440, 100);
        assert!(engine.is_finished());
        assert_eq!(engine.status(0), None);
        assert!(!engine.is_playing(0));
    }

    #[test]
    fn register_fills_fixed_arena() {
        let clock = ManualClock::default();
        let pwms: [MockPwm; 5] = core::array::from_fn(|_| MockPwm::new(0));
        let mut engine: TestEngine = Engine::new(&clock, EngineConfig::default());
        for (i, pwm) in pwms.iter().take(4).enumerate() {
            assert_eq!(engine.register_channel(pwm, ChannelConfig::default()), Some(i));
        }
        assert_eq!(engine.register_channel(&pwms[4], ChannelConfig::default()), None);
        assert_eq!(engine.channel_count(), 4);
    }

    #[test]
    fn three_note_score_dispatches_three_times_then_goes_inactive() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, false);

        engine.update();
        assert_eq!(pwms[0].tones(), 1);
        // 500 + 250 + 1000 ms of notes, plus slack
        run(&mut engine, &clock, 1800);

        assert_eq!(pwms[0].tones(), 3);
        assert!(!engine.is_active(0));
        assert!(!engine.is_playing(0));
        assert!(engine.is_finished());

        let before = engine.status(0);
        pwms[0].clear();
        engine.update();
        assert_eq!(engine.status(0), before);
        assert!(pwms[0].calls().is_empty());
    }

    #[test]
    fn looped_score_repeats() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, true);

        engine.update();
        run(&mut engine, &clock, 1750);
        // third note just expired; next update rewinds
        let status = engine.status(0).unwrap();
        assert_eq!(status.index, 0);
        assert!(status.active);
        run(&mut engine, &clock, 1750 * 2);
        assert!(engine.is_active(0));

        let periods: std::vec::Vec<u32> = pwms[0]
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::Period(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert!(periods.len() >= 9, "{:?}", periods);
        assert_eq!(periods[0..3], periods[3..6]);
        assert_eq!(periods[0..3], periods[6..9]);
    }

    #[test]
    fn rest_occupies_time_silently() {
        let score = [
            ScoreNote::rest(NoteLength::Quarter),
            ScoreNote::new(PitchClass::A, Octave::O4, NoteLength::Quarter),
        ];
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, &score, false);

        engine.update();
        assert!(engine.is_playing(0));
        assert_eq!(pwms[0].duty(), 0);
        assert_eq!(pwms[0].tones(), 0);
        assert_eq!(engine.status(0).unwrap().stop_at, 500);

        run(&mut engine, &clock, 499);
        assert_eq!(pwms[0].tones(), 0);
        run(&mut engine, &clock, 1);
        assert_eq!(pwms[0].tones(), 1);
        assert_eq!(pwms[0].period(), 2271);
    }

    #[test]
    fn tempo_change_applies_to_next_note() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, false);

        engine.update();
        assert_eq!(engine.status(0).unwrap().stop_at, 500);
        engine.set_tempo(60);
        // in-flight note keeps its stop time
        assert_eq!(engine.status(0).unwrap().stop_at, 500);
        run(&mut engine, &clock, 500);
        // eighth at 60 BPM
        assert_eq!(engine.status(0).unwrap().stop_at, 1000);
    }

    #[test]
    fn set_part_overrides_score_in_progress() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, false);
        engine.update();
        run(&mut engine, &clock, 600);
        assert_eq!(engine.status(0).unwrap().index, 2);

        engine.set_part(0, &THREE[2..], true);
        let status = engine.status(0).unwrap();
        assert_eq!((status.index, status.len, status.looped), (0, 1, true));
    }

    #[test]
    fn channels_advance_independently() {
        let fast = [ScoreNote::new(PitchClass::C, Octave::O4, NoteLength::Sixteenth); 4];
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0), MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, false);
        engine.set_part(1, &fast, false);

        engine.update();
        run(&mut engine, &clock, 600);
        assert_eq!(pwms[0].tones(), 2);
        assert_eq!(pwms[1].tones(), 4);
        assert!(!engine.is_active(1));
        assert!(engine.is_active(0));
    }

    #[test]
    fn tick_counter_wraparound() {
        let clock = ManualClock::at(u32::MAX - 100);
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, &THREE[..1], false);

        engine.update();
        let stop_at = engine.status(0).unwrap().stop_at;
        assert_eq!(stop_at, 399);

        run(&mut engine, &clock, 499);
        assert!(engine.is_playing(0));
        run(&mut engine, &clock, 1);
        assert!(!engine.is_playing(0));
    }

    #[test]
    fn sustained_note_is_never_auto_stopped() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.note_on(0, 1000, 0);
        run(&mut engine, &clock, 5000);
        assert_eq!(pwms[0].duty(), 499);

        engine.silence(0);
        assert_eq!(pwms[0].duty(), 0);
    }

    #[test]
    fn sustained_manual_tone_yields_to_score_on_next_update() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, false);
        engine.update();
        assert_eq!(engine.status(0).unwrap().index, 1);

        engine.note_on(0, 1000, 0);
        assert_eq!(pwms[0].period(), 999);
        assert!(!engine.is_playing(0));

        // the score carries on from its cursor straight away
        engine.update();
        let status = engine.status(0).unwrap();
        assert_eq!(status.index, 2);
        assert_eq!(status.stop_at, 250);
        assert_eq!(pwms[0].period(), 1_000_000 / 523 - 1);
    }

    #[test]
    fn timed_manual_tone_delays_score_until_it_expires() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, false);
        engine.update();

        engine.note_on(0, 1000, 50);
        assert_eq!(engine.status(0).unwrap().stop_at, 50);

        run(&mut engine, &clock, 49);
        assert_eq!(pwms[0].period(), 999);
        assert_eq!(engine.status(0).unwrap().index, 1);

        run(&mut engine, &clock, 1);
        let status = engine.status(0).unwrap();
        assert_eq!(status.index, 2);
        assert_eq!(status.stop_at, 300);
        assert_eq!(pwms[0].period(), 1_000_000 / 523 - 1);
    }

    #[test]
    fn clear_part_stops_dispatch() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_part(0, THREE, true);
        engine.update();
        engine.clear_part(0);

        assert!(engine.is_finished());
        assert_eq!(pwms[0].duty(), 0);
        run(&mut engine, &clock, 100);
        assert_eq!(pwms[0].tones(), 1);
    }

    #[test]
    fn play_arrangement_assigns_parts_and_tempo() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        let arrangement = Arrangement::new("test", 60)
            .with_part(Part::new("a", THREE).looped())
            .with_part(Part::new("b", THREE));

        engine.play_arrangement(&arrangement);

        assert_eq!(engine.tempo(), 60);
        assert!(engine.is_active(0));
        assert!(engine.status(0).unwrap().looped);
        assert!(!engine.is_active(1));
    }

    #[test]
    fn reference_pitch_retunes_next_note() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        engine.set_reference_pitch(500.0);
        engine.set_part(0, &THREE[..1], false);
        engine.update();
        // 1 MHz / 500 Hz - 1
        assert_eq!(pwms[0].period(), 1999);
    }

    #[test]
    fn zero_tempo_is_clamped() {
        let clock = ManualClock::default();
        let mut engine: TestEngine = Engine::new(&clock, EngineConfig { initial_bpm: 0, ..Default::default() });
        assert_eq!(engine.tempo(), 1);
        engine.set_tempo(0);
        assert_eq!(engine.tempo(), 1);
    }

    #[test]
    fn split_halves_work_together() {
        let clock = ManualClock::default();
        let pwms = [MockPwm::new(0)];
        let mut engine = engine(&clock, &pwms);
        let (ticker, mut seq) = engine.split();
        seq.set_part(0, THREE, false);
        seq.update();
        for _ in 0..2000 {
            clock.advance(1);
            ticker.tick();
            seq.update();
        }
        assert_eq!(ticker.channel_count(), 1);
        assert_eq!(pwms[0].tones(), 3);
    }
}
