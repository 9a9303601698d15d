#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, PushError};

use crate::dsp::PulseBuffer;

/// Commands sent from the control thread to the audio thread
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerMessage {
    /// Replace the loop and play it from the start
    Play(PulseBuffer),
    /// Suspend output and hand the loop back
    Stop,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<PlayerMessage>;
}

pub trait MessageSender {
    /// Queue a message, handing it back if there is no room
    fn push(&mut self, msg: PlayerMessage) -> Result<(), PlayerMessage>;
}

/// Audio-thread end of the ring that returns replaced loops.
///
/// Loops are never dropped on the audio thread; they travel back here so
/// their memory is freed by the control thread.
pub trait RetiredSender {
    /// Whether one more loop can be handed back right now
    fn has_room(&self) -> bool;
    fn retire(&mut self, buffer: PulseBuffer) -> Result<(), PulseBuffer>;
}

/// Control-thread end of the ring that returns replaced loops
pub trait RetiredReceiver {
    fn take(&mut self) -> Option<PulseBuffer>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<PlayerMessage> {
    fn pop(&mut self) -> Option<PlayerMessage> {
        Consumer::pop(self).ok()
    }
}

#[cfg(feature = "rtrb")]
impl MessageSender for Producer<PlayerMessage> {
    fn push(&mut self, msg: PlayerMessage) -> Result<(), PlayerMessage> {
        Producer::push(self, msg).map_err(|PushError::Full(msg)| msg)
    }
}

#[cfg(feature = "rtrb")]
impl RetiredSender for Producer<PulseBuffer> {
    fn has_room(&self) -> bool {
        self.slots() > 0
    }

    fn retire(&mut self, buffer: PulseBuffer) -> Result<(), PulseBuffer> {
        Producer::push(self, buffer).map_err(|PushError::Full(buffer)| buffer)
    }
}

#[cfg(feature = "rtrb")]
impl RetiredReceiver for Consumer<PulseBuffer> {
    fn take(&mut self) -> Option<PulseBuffer> {
        Consumer::pop(self).ok()
    }
}
