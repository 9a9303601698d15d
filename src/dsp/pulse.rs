use crate::params::PwmParams;

/*
One-Period Pulse Buffer
=======================

The generator never runs an oscillator. Instead it renders exactly one period
of the waveform into a buffer and the player loops that buffer forever. Any
parameter change throws the buffer away and renders a new one.

Loop length
-----------

    n = floor(sample_rate * period_us / 1e6)      samples per period
    h = min(trunc(sample_rate * pulse_us / 1e6), n)  samples at the high level

At 48 kHz a 20 ms period gives n = 960 and a 1.5 ms pulse gives h = 72.
Periods shorter than one sample produce no buffer at all.

Because n is rounded down, the played frequency is sample_rate / n, which can
sit slightly above the requested one at high frequencies.

DC Cut
------

A ±1 pulse wave with h high samples out of n has a mean of

    m = (h - (n - h)) / n = (2h - n) / n

That constant offset is inaudible but pushes speaker cones off-centre and
wastes headroom. With DC cut enabled the levels are shifted by -m and then
scaled back into [-1, 1]:

    high = ( 1 - m) / (1 + |m|)
    low  = (-1 - m) / (1 + |m|)

The peak-to-peak swing stays 2 / (1 + |m|) and the mean is exactly zero.
Narrow pulses end up as a tall spike over a slightly negative floor:

    duty 50%   m =  0.0   high =  1.000  low = -1.000
    duty 25%   m = -0.5   high =  1.000  low = -0.333
    duty 10%   m = -0.8   high =  1.000  low = -0.111

At 0% or 100% duty the waveform is pure DC and the buffer is silent.

Channels
--------

Mono by default. With inversion enabled a second channel carries the
sample-wise negation of the first, so left and right are 180 degrees apart.
*/

/// High and low output levels for a pulse with `high_frames` of `frames` samples
pub fn pulse_levels(high_frames: usize, frames: usize, dc_cut: bool) -> (f32, f32) {
    if !dc_cut || frames == 0 {
        return (1.0, -1.0);
    }
    let mean = (2.0 * high_frames as f64 - frames as f64) / frames as f64;
    let scale = 1.0 + mean.abs();
    (
        ((1.0 - mean) / scale) as f32,
        ((-1.0 - mean) / scale) as f32,
    )
}

/// A single rendered period of the PWM waveform, one or two channels
#[derive(Debug, Clone, PartialEq)]
pub struct PulseBuffer {
    channels: Vec<Vec<f32>>,
    high_frames: usize,
    sample_rate: f32,
}

impl PulseBuffer {
    /// Render one period at `sample_rate`.
    ///
    /// Returns `None` when the period is shorter than one sample.
    pub fn render(params: &PwmParams, sample_rate: f32) -> Option<Self> {
        let sample_rate_f64 = sample_rate as f64;
        let frames = (sample_rate_f64 * params.period_us() / 1e6).floor();
        if frames < 1.0 {
            return None;
        }
        let frames = frames as usize;
        let high_frames =
            ((params.pulse_us() * sample_rate_f64 / 1e6).trunc().max(0.0) as usize).min(frames);

        let (high, low) = pulse_levels(high_frames, frames, params.dc_cut());

        let mut primary = vec![low; frames];
        primary[..high_frames].fill(high);

        let mut channels = Vec::with_capacity(2);
        if params.inverted() {
            let inverted: Vec<f32> = primary.iter().map(|&s| -s).collect();
            channels.push(primary);
            channels.push(inverted);
        } else {
            channels.push(primary);
        }

        Some(Self {
            channels,
            high_frames,
            sample_rate,
        })
    }

    /// Samples per period
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Samples held at the high level at the start of the period
    pub fn high_frames(&self) -> usize {
        self.high_frames
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples of one channel. Panics if `index >= channel_count()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frequency actually produced, after rounding the period to whole samples
    pub fn effective_frequency_hz(&self) -> f32 {
        self.sample_rate / self.frames() as f32
    }
}
