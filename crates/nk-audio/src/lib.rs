//! Host-side hardware stand-ins and audio output for notekit.
//!
//! [`SimPwm`] and [`SimClock`] implement the engine's hardware traits so a
//! score can be played on a desktop; [`SquareRenderer`] turns their register
//! state into PCM, and [`CpalOutput`] sends it to the default device.

mod cpal_backend;
mod frame;
mod sim;
mod square;
mod traits;

pub use cpal_backend::CpalOutput;
pub use frame::Frame;
pub use sim::{SimClock, SimPwm};
pub use square::{SquareRenderer, DEFAULT_AMPLITUDE};
pub use traits::{AudioError, AudioOutput};
