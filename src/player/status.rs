/// Snapshot of the audio thread, published once per callback.
///
/// `Copy` and allocation-free so it can cross a ring buffer from the
/// realtime thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerStatus {
    /// Whether a loop is currently being played
    pub playing: bool,
    /// Samples per loop (0 when nothing is loaded)
    pub loop_frames: usize,
    /// Channels in the loaded loop (1 or 2, 0 when nothing is loaded)
    pub loop_channels: usize,
    /// Next frame to be played within the loop
    pub position: usize,
    /// Total frames written to the device since start
    pub frames_rendered: u64,
}
