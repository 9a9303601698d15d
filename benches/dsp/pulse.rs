//! Benchmarks for one-period buffer synthesis.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pwm_player::{dsp::PulseBuffer, PwmParams};

pub fn bench_pulse(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pulse");

    // 20 Hz is the longest loop the form allows, 20 kHz the shortest
    for &freq in &[20.0, 440.0, 20_000.0] {
        let mono = PwmParams::new().with_frequency_hz(freq).with_duty_percent(30.0);
        group.bench_with_input(BenchmarkId::new("mono", freq), &mono, |b, params| {
            b.iter(|| PulseBuffer::render(black_box(params), black_box(48_000.0)))
        });

        // Second channel plus level compensation
        let stereo = mono.with_inverted(true).with_dc_cut(true);
        group.bench_with_input(BenchmarkId::new("stereo_dc_cut", freq), &stereo, |b, params| {
            b.iter(|| PulseBuffer::render(black_box(params), black_box(48_000.0)))
        });
    }

    group.finish();
}
