//! Benchmarks for realistic audio-callback workloads.

mod engine;

pub use engine::bench_engine;
