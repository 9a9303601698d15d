//! Waveform synthesis and loop playback primitives.
//!
//! Rendering a [`pulse::PulseBuffer`] allocates and belongs on the control
//! thread. [`looper::LoopReader`] is allocation-free and runs inside the audio
//! callback.

/// Cyclic reader that copies a loop into interleaved device buffers.
pub mod looper;
/// One-period PWM buffer synthesis and DC-cut level math.
pub mod pulse;

pub use looper::LoopReader;
pub use pulse::PulseBuffer;
