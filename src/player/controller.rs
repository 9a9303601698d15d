use crate::dsp::PulseBuffer;
use crate::params::{ParamEdit, ParamError, PwmParams};

use super::message::{MessageSender, PlayerMessage, RetiredReceiver};

/// Errors produced by [`PwmController`]
#[derive(Debug, Clone, PartialEq)]
pub enum ControlError {
    /// The edit was rejected; parameters are unchanged
    Param(ParamError),
    /// The audio thread has not drained earlier commands yet
    QueueFull,
}

impl std::fmt::Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::Param(err) => write!(f, "{}", err),
            ControlError::QueueFull => write!(f, "audio command queue is full, try again"),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControlError::Param(err) => Some(err),
            ControlError::QueueFull => None,
        }
    }
}

impl From<ParamError> for ControlError {
    fn from(err: ParamError) -> Self {
        ControlError::Param(err)
    }
}

/// Control-thread side of the player.
///
/// Holds the parameters and the play state. While playing, every effective
/// change renders a fresh loop and replaces the one on the audio thread.
/// While stopped, edits only update the parameters; the loop is rendered on
/// the next [`play`](Self::play).
///
/// A command that cannot be queued leaves the controller as it was, so the
/// state shown to the user always matches what the audio thread was told.
pub struct PwmController<S: MessageSender, C: RetiredReceiver> {
    params: PwmParams,
    sample_rate: f32,
    playing: bool,
    tx: S,
    retired: C,
}

impl<S: MessageSender, C: RetiredReceiver> PwmController<S, C> {
    pub fn new(params: PwmParams, sample_rate: f32, tx: S, retired: C) -> Self {
        Self {
            params,
            sample_rate,
            playing: false,
            tx,
            retired,
        }
    }

    pub fn params(&self) -> &PwmParams {
        &self.params
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start (or restart) the loop from its first sample
    pub fn play(&mut self) -> Result<(), ControlError> {
        self.restart()?;
        self.playing = true;
        Ok(())
    }

    /// Suspend output
    pub fn stop(&mut self) -> Result<(), ControlError> {
        self.send(PlayerMessage::Stop)?;
        self.playing = false;
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<(), ControlError> {
        if self.playing {
            self.stop()
        } else {
            self.play()
        }
    }

    /// Apply an edit; restarts the loop if playing and something changed
    pub fn edit(&mut self, edit: ParamEdit) -> Result<(), ControlError> {
        let before = self.params;
        let changed = self.params.apply(edit)?;
        if changed && self.playing {
            if let Err(err) = self.restart() {
                self.params = before;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Free loops the audio thread has finished with. Returns how many.
    pub fn reclaim(&mut self) -> usize {
        let mut count = 0;
        while self.retired.take().is_some() {
            count += 1;
        }
        count
    }

    fn restart(&mut self) -> Result<(), ControlError> {
        match PulseBuffer::render(&self.params, self.sample_rate) {
            Some(buffer) => {
                log::debug!(
                    "loop rebuilt: {} frames, {} high, {} channel(s)",
                    buffer.frames(),
                    buffer.high_frames(),
                    buffer.channel_count()
                );
                self.send(PlayerMessage::Play(buffer))
            }
            None => {
                log::debug!(
                    "period {} us is shorter than one sample at {} Hz, output silenced",
                    self.params.period_us(),
                    self.sample_rate
                );
                self.send(PlayerMessage::Stop)
            }
        }
    }

    fn send(&mut self, msg: PlayerMessage) -> Result<(), ControlError> {
        self.reclaim();
        self.tx.push(msg).map_err(|_| {
            log::warn!("audio command queue full, dropping command");
            ControlError::QueueFull
        })
    }
}
