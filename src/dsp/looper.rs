use crate::dsp::pulse::PulseBuffer;

/// Reads a [`PulseBuffer`] cyclically into interleaved device buffers.
///
/// Device channel `c` takes loop channel `min(c, loop_channels - 1)`: a mono
/// loop is copied to every output, a stereo loop feeds left and right and any
/// further device channels repeat the right channel.
#[derive(Debug, Default, Clone)]
pub struct LoopReader {
    position: usize,
}

impl LoopReader {
    pub fn new() -> Self {
        Self { position: 0 }
    }

    /// Rewind to the first sample of the loop
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Frame index that will be played next
    pub fn position(&self) -> usize {
        self.position
    }

    /// Fill `out` (interleaved, `channels` wide) from the loop, scaled by `gain`.
    ///
    /// A trailing partial frame is zeroed.
    pub fn render_interleaved(
        &mut self,
        buffer: &PulseBuffer,
        out: &mut [f32],
        channels: usize,
        gain: f32,
    ) {
        if channels == 0 {
            return;
        }
        let frames = buffer.frames();
        let last_channel = buffer.channel_count() - 1;
        if self.position >= frames {
            self.position = 0;
        }

        let mut chunks = out.chunks_exact_mut(channels);
        for frame in &mut chunks {
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = buffer.channel(ch.min(last_channel))[self.position] * gain;
            }
            self.position += 1;
            if self.position == frames {
                self.position = 0;
            }
        }
        chunks.into_remainder().fill(0.0);
    }
}
