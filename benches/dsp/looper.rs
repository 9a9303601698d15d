//! Benchmarks for reading a loop into interleaved device buffers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pwm_player::{
    dsp::{LoopReader, PulseBuffer},
    PwmParams,
};

use crate::BLOCK_SIZES;

pub fn bench_looper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/looper");

    // Short loop so every block wraps several times
    let params = PwmParams::new().with_frequency_hz(2_000.0).with_inverted(true);
    let Some(buffer) = PulseBuffer::render(&params, 48_000.0) else {
        return;
    };

    for &size in BLOCK_SIZES {
        for &channels in &[1usize, 2, 8] {
            let mut out = vec![0.0f32; size * channels];
            let mut reader = LoopReader::new();
            group.bench_with_input(
                BenchmarkId::new(format!("{channels}ch"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        reader.render_interleaved(&buffer, black_box(&mut out), channels, 1.0);
                    })
                },
            );
        }
    }

    group.finish();
}
