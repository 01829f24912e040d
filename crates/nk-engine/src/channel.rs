//! Score cursor for a single output channel.

use nk_ir::ScoreNote;

/// What one sequencer step did on a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Dispatch this note; the cursor has moved past it.
    Note(ScoreNote),
    /// End of a looping score: the cursor went back to the start.
    Rewind,
    /// End of a non-looping score: the channel is now inactive.
    Finished,
    /// Channel is inactive; nothing happened.
    Idle,
}

/// Playback position of a channel within its assigned score.
///
/// The score is borrowed for `'s`; it must outlive the channel's playback,
/// which the borrow checker enforces.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelState<'s> {
    score: &'s [ScoreNote],
    index: usize,
    active: bool,
    looped: bool,
}

impl<'s> ChannelState<'s> {
    pub const fn new() -> Self {
        Self { score: &[], index: 0, active: false, looped: false }
    }

    /// Replace the score and restart from its first note, dropping
    /// whatever was in progress.
    pub fn assign(&mut self, score: &'s [ScoreNote], looped: bool) {
        self.score = score;
        self.index = 0;
        self.active = true;
        self.looped = looped;
    }

    /// Stop dispatching. The score stays assigned but is skipped.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Move the cursor one step.
    pub fn step(&mut self) -> Step {
        if !self.active {
            return Step::Idle;
        }
        if let Some(note) = self.score.get(self.index) {
            self.index += 1;
            Step::Note(*note)
        } else if self.looped {
            self.index = 0;
            Step::Rewind
        } else {
            self.active = false;
            Step::Finished
        }
    }

    pub fn score(&self) -> &'s [ScoreNote] {
        self.score
    }

    /// Index of the next note to dispatch.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.score.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }
}
