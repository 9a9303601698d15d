//! Playback plumbing between the control thread and the audio callback.
//!
//! The controller renders loops and sends them over a lock-free ring; the
//! engine swaps them in on the audio thread, hands replaced loops back over a
//! second ring and reports a small status snapshot.

pub mod controller;
pub mod engine;
pub mod message;
pub mod status;

pub use controller::{ControlError, PwmController};
pub use engine::PwmEngine;
pub use message::{MessageReceiver, MessageSender, PlayerMessage, RetiredReceiver, RetiredSender};
pub use status::PlayerStatus;

#[cfg(feature = "rtrb")]
use crate::{dsp::PulseBuffer, params::PwmParams};
#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

/// Controller wired to rtrb rings
#[cfg(feature = "rtrb")]
pub type RingController = PwmController<Producer<PlayerMessage>, Consumer<PulseBuffer>>;
/// Engine wired to rtrb rings
#[cfg(feature = "rtrb")]
pub type RingEngine = PwmEngine<Consumer<PlayerMessage>, Producer<PulseBuffer>>;

/// Create a controller and engine joined by command and return rings of `capacity` slots
#[cfg(feature = "rtrb")]
pub fn link(params: PwmParams, sample_rate: f32, capacity: usize) -> (RingController, RingEngine) {
    let (msg_tx, msg_rx) = RingBuffer::<PlayerMessage>::new(capacity);
    let (ret_tx, ret_rx) = RingBuffer::<PulseBuffer>::new(capacity);
    (
        PwmController::new(params, sample_rate, msg_tx, ret_rx),
        PwmEngine::new(msg_rx, ret_tx),
    )
}
