//! Benchmarks for the low-level DSP primitives.

mod looper;
mod pulse;

pub use looper::bench_looper;
pub use pulse::bench_pulse;
