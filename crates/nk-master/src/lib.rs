//! Headless controller for notekit.
//!
//! Runs an arrangement on simulated PWM hardware, either live through the
//! default audio device or offline into a WAV buffer. Shared by the CLI and
//! the integration tests.

mod logger;
mod session;
mod wav;

use nk_audio::{CpalOutput, Frame};
use nk_ir::Arrangement;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

pub use logger::StderrLogger;
pub use session::{arrangement_duration_ms, Session, TIMER_CLOCK_HZ, TIMER_PRESCALER};
pub use wav::{frames_to_wav, write_wav};

/// Silence appended after the last note so the device drains cleanly.
const TAIL_MS: u64 = 200;

/// Owns an arrangement and manages its playback.
pub struct Controller {
    arrangement: Arrangement<'static>,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    elapsed_ms: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(arrangement: Arrangement<'static>) -> Self {
        Self { arrangement, playback: None }
    }

    pub fn arrangement(&self) -> &Arrangement<'static> {
        &self.arrangement
    }

    /// Override the arrangement's tempo for subsequent playback.
    pub fn set_tempo(&mut self, bpm: u16) {
        self.arrangement.bpm = bpm.max(1);
    }

    // --- Real-time playback ---

    pub fn play(&mut self) {
        self.stop();

        let arrangement = self.arrangement.clone();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let elapsed_ms = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let elapsed = elapsed_ms.clone();
        let done = finished.clone();

        let thread = std::thread::spawn(move || {
            audio_thread(arrangement, stop, elapsed, done);
        });

        self.playback = Some(PlaybackHandle {
            stop_signal,
            elapsed_ms,
            finished,
            thread: Some(thread),
        });
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Milliseconds played so far, while playback is running.
    pub fn position_ms(&self) -> Option<u64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(pb.elapsed_ms.load(Ordering::Relaxed))
    }

    // --- Offline rendering ---

    pub fn render_frames(&self, sample_rate: u32, max_frames: usize) -> Vec<Frame> {
        let mut session = Session::new(&self.arrangement, sample_rate);
        let max_ms = max_frames as u64 * 1000 / sample_rate.max(1) as u64 + 1;

        let mut frames = Vec::with_capacity(max_frames);
        session.run(max_ms, |frame| {
            if frames.len() < max_frames {
                frames.push(frame);
            }
        });
        log::info!(
            "rendered {} frames ({} ms, finished: {})",
            frames.len(),
            session.elapsed_ms(),
            session.is_finished()
        );
        frames
    }

    pub fn render_to_wav(&self, sample_rate: u32, max_seconds: u32) -> Vec<u8> {
        let max_frames = sample_rate as usize * max_seconds as usize;
        let frames = self.render_frames(sample_rate, max_frames);
        frames_to_wav(&frames, sample_rate)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn audio_thread(
    arrangement: Arrangement<'static>,
    stop_signal: Arc<AtomicBool>,
    elapsed_ms: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
) {
    let (mut output, consumer) = match CpalOutput::new() {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("{}", e);
            finished.store(true, Ordering::Relaxed);
            return;
        }
    };
    if let Err(e) = output.build_stream(consumer) {
        log::error!("{}", e);
        finished.store(true, Ordering::Relaxed);
        return;
    }

    let sample_rate = nk_audio::AudioOutput::sample_rate(&output);
    let mut session = Session::new(&arrangement, sample_rate);

    while !session.is_finished() && !stop_signal.load(Ordering::Relaxed) {
        session.step_ms(|frame| output.write_spin(frame));
        elapsed_ms.store(session.elapsed_ms(), Ordering::Relaxed);
    }

    for _ in 0..sample_rate as u64 * TAIL_MS / 1000 {
        output.write_spin(Frame::silence());
    }

    finished.store(true, Ordering::Relaxed);
}
