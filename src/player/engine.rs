use crate::dsp::{LoopReader, PulseBuffer};

use super::message::{MessageReceiver, PlayerMessage, RetiredSender};
use super::status::PlayerStatus;

/// Audio-thread side of the player.
///
/// Owns the current loop and renders it into the device buffer. Control
/// messages are drained at the top of every callback, so a new loop always
/// starts on a callback boundary. A replaced loop is handed back through
/// `retired` instead of being freed here; while that ring is full, commands
/// stay queued and the current loop keeps playing.
pub struct PwmEngine<R: MessageReceiver, T: RetiredSender> {
    rx: R,
    retired: T,
    current: Option<PulseBuffer>,
    reader: LoopReader,
    gain: f32,
    frames_rendered: u64,
}

impl<R: MessageReceiver, T: RetiredSender> PwmEngine<R, T> {
    pub fn new(rx: R, retired: T) -> Self {
        Self {
            rx,
            retired,
            current: None,
            reader: LoopReader::new(),
            gain: 1.0,
            frames_rendered: 0,
        }
    }

    /// Set the master gain (clamped to 0.0-1.0, NaN mutes)
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = if gain.is_nan() { 0.0 } else { gain.clamp(0.0, 1.0) };
        self
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Render one callback's worth of interleaved audio
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        self.process_messages();

        match &self.current {
            Some(buffer) => {
                self.reader
                    .render_interleaved(buffer, out, channels, self.gain);
            }
            None => out.fill(0.0),
        }

        if channels > 0 {
            self.frames_rendered += (out.len() / channels) as u64;
        }
    }

    pub fn status(&self) -> PlayerStatus {
        let (loop_frames, loop_channels) = self
            .current
            .as_ref()
            .map(|b| (b.frames(), b.channel_count()))
            .unwrap_or((0, 0));
        PlayerStatus {
            playing: self.current.is_some(),
            loop_frames,
            loop_channels,
            position: self.reader.position(),
            frames_rendered: self.frames_rendered,
        }
    }

    fn process_messages(&mut self) {
        loop {
            if self.current.is_some() && !self.retired.has_room() {
                break;
            }
            let Some(msg) = self.rx.pop() else {
                break;
            };
            let next = match msg {
                PlayerMessage::Play(buffer) => Some(buffer),
                PlayerMessage::Stop => None,
            };
            if let Some(old) = std::mem::replace(&mut self.current, next) {
                // Room was checked above and this is the only producer
                let _ = self.retired.retire(old);
            }
            self.reader.reset();
        }
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;
    use crate::params::PwmParams;
    use rtrb::{Consumer, Producer, RingBuffer};

    type TestEngine = PwmEngine<Consumer<PlayerMessage>, Producer<PulseBuffer>>;

    fn buffer(duty: f64) -> PulseBuffer {
        let params = PwmParams::new()
            .with_period_us(1_000.0)
            .with_duty_percent(duty);
        PulseBuffer::render(&params, 8_000.0).unwrap()
    }

    fn rings(
        retired_len: usize,
    ) -> (Producer<PlayerMessage>, TestEngine, Consumer<PulseBuffer>) {
        let (tx, rx) = RingBuffer::<PlayerMessage>::new(4);
        let (ret_tx, ret_rx) = RingBuffer::<PulseBuffer>::new(retired_len);
        (tx, PwmEngine::new(rx, ret_tx), ret_rx)
    }

    #[test]
    fn silent_until_played() {
        let (_tx, mut engine, _ret) = rings(4);
        let mut out = vec![0.5f32; 16];
        engine.render(&mut out, 2);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(!engine.status().playing);
        assert_eq!(engine.status().frames_rendered, 8);
    }

    #[test]
    fn play_then_stop() {
        let (mut tx, engine, mut ret) = rings(4);
        let mut engine = engine.with_gain(0.25);

        tx.push(PlayerMessage::Play(buffer(50.0))).unwrap();
        let mut out = vec![0.0f32; 8];
        engine.render(&mut out, 1);
        assert_eq!(&out[..4], &[0.25; 4]);
        assert_eq!(&out[4..], &[-0.25; 4]);

        let status = engine.status();
        assert!(status.playing);
        assert_eq!(status.loop_frames, 8);
        assert_eq!(status.loop_channels, 1);

        tx.push(PlayerMessage::Stop).unwrap();
        engine.render(&mut out, 1);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(!engine.status().playing);
        assert_eq!(ret.pop().ok(), Some(buffer(50.0)));
    }

    #[test]
    fn new_loop_restarts_from_phase_zero() {
        let (mut tx, mut engine, _ret) = rings(4);

        tx.push(PlayerMessage::Play(buffer(50.0))).unwrap();
        let mut out = vec![0.0f32; 5];
        engine.render(&mut out, 1);
        assert_eq!(engine.status().position, 5);

        tx.push(PlayerMessage::Play(buffer(25.0))).unwrap();
        let mut out = vec![0.0f32; 4];
        engine.render(&mut out, 1);
        assert_eq!(out, vec![1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn replaced_loops_are_handed_back() {
        let (mut tx, mut engine, mut ret) = rings(1);
        let mut out = vec![0.0f32; 8];

        tx.push(PlayerMessage::Play(buffer(50.0))).unwrap();
        engine.render(&mut out, 1);
        tx.push(PlayerMessage::Play(buffer(25.0))).unwrap();
        engine.render(&mut out, 1);
        assert_eq!(out, vec![1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0]);

        // Return ring is full: the next loop waits and the current one keeps playing
        tx.push(PlayerMessage::Play(buffer(75.0))).unwrap();
        engine.render(&mut out, 1);
        assert_eq!(engine.status().loop_frames, 8);
        assert_eq!(&out[..2], &[1.0, 1.0]);
        assert_eq!(&out[2..], &[-1.0; 6]);

        assert_eq!(ret.pop().ok(), Some(buffer(50.0)));
        engine.render(&mut out, 1);
        assert_eq!(&out[..6], &[1.0; 6]);
        assert_eq!(ret.pop().ok(), Some(buffer(25.0)));
        assert!(ret.pop().is_err());
    }

    #[test]
    fn gain_is_clamped() {
        let (_tx, engine, _ret) = rings(1);
        assert_eq!(engine.with_gain(3.0).gain(), 1.0);
        let (_tx, engine, _ret) = rings(1);
        assert_eq!(engine.with_gain(f32::NAN).gain(), 0.0);
    }
}
