//! Engine callbacks, steady and while the user is sweeping a parameter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pwm_player::{player, ParamEdit, PwmParams};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f32; size * 2];

        // Steady playback of a stereo loop
        let (mut controller, mut engine) =
            player::link(PwmParams::new().with_inverted(true), 48_000.0, 16);
        let _ = controller.play();
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut out), 2))
        });

        // A new loop arrives before every callback; the old one is freed by the controller
        let (mut controller, mut engine) = player::link(PwmParams::new(), 48_000.0, 16);
        let _ = controller.play();
        let mut duty = 0.0;
        group.bench_with_input(BenchmarkId::new("sweep_duty", size), &size, |b, _| {
            b.iter(|| {
                duty = (duty + 0.5) % 100.0;
                let _ = controller.edit(ParamEdit::Duty(duty));
                engine.render(black_box(&mut out), 2);
            })
        });
    }

    group.finish();
}
