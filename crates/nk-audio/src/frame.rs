//! PCM frame type.

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Same value on both sides. Buzzers have no stereo image.
    pub const fn mono(value: i16) -> Self {
        Self { left: value, right: value }
    }

    /// Mix another frame into this one, saturating at full scale.
    pub fn mix(&mut self, other: Frame) {
        self.left = self.left.saturating_add(other.left);
        self.right = self.right.saturating_add(other.right);
    }

    pub fn is_silent(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}
