use pwm_player::{
    params::Field,
    player::{self, ControlError},
    ParamEdit, PwmParams,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn mean(samples: impl Iterator<Item = f32>) -> f64 {
    let (sum, count) = samples.fold((0.0f64, 0usize), |(s, n), x| (s + x as f64, n + 1));
    sum / count as f64
}

#[test]
fn controller_drives_engine_end_to_end() {
    let (mut controller, mut engine) = player::link(PwmParams::new(), SAMPLE_RATE, 8);

    // Stereo device, one 20 ms period per callback
    let channels = 2;
    let mut out = vec![0.0f32; 960 * channels];

    engine.render(&mut out, channels);
    assert!(out.iter().all(|&s| s == 0.0), "silent before play");

    controller.play().unwrap();
    engine.render(&mut out, channels);
    let left: Vec<f32> = out.iter().step_by(channels).copied().collect();
    assert_eq!(left.iter().filter(|&&s| s == 1.0).count(), 72);
    assert_eq!(left.iter().filter(|&&s| s == -1.0).count(), 888);
    // Mono loop duplicated to both outputs
    assert!(out.chunks(2).all(|f| f[0] == f[1]));

    controller.edit(ParamEdit::Inverted(true)).unwrap();
    controller.edit(ParamEdit::DcCut(true)).unwrap();
    engine.render(&mut out, channels);
    assert!(out.chunks(2).all(|f| f[0] == -f[1]), "right channel inverted");
    let dc_left = mean(out.iter().step_by(channels).copied());
    assert!(dc_left.abs() < 1e-5, "DC cut leaves mean {dc_left}");
    assert_eq!(engine.status().loop_channels, 2);

    controller.stop().unwrap();
    engine.render(&mut out, channels);
    assert!(out.iter().all(|&s| s == 0.0), "silent after stop");
}

#[test]
fn frequency_change_while_playing_rebuilds_loop() {
    let (mut controller, mut engine) =
        player::link(PwmParams::new().with_duty_percent(50.0), SAMPLE_RATE, 8);
    let mut out = vec![0.0f32; 256];

    controller.play().unwrap();
    engine.render(&mut out, 1);
    assert_eq!(engine.status().loop_frames, 960);

    controller.edit(ParamEdit::Frequency(1_000.0)).unwrap();
    engine.render(&mut out, 1);
    assert_eq!(engine.status().loop_frames, 48);
    assert_eq!(controller.params().display_value(Field::Duty), 50.0);

    // 24 high, 24 low, repeating from the start of the new loop
    assert!(out[..24].iter().all(|&s| s == 1.0));
    assert!(out[24..48].iter().all(|&s| s == -1.0));
    assert_eq!(&out[48..96], &out[..48]);
}

#[test]
fn output_stays_in_range() {
    for duty in [0.0, 12.5, 50.0, 87.5, 100.0] {
        for dc_cut in [false, true] {
            let params = PwmParams::new()
                .with_frequency_hz(440.0)
                .with_duty_percent(duty)
                .with_dc_cut(dc_cut);
            let (mut controller, engine) = player::link(params, 44_100.0, 4);
            let mut engine = engine.with_gain(0.8);
            controller.play().unwrap();

            let mut out = vec![0.0f32; 4096];
            engine.render(&mut out, 2);
            assert!(out.iter().all(|s| s.abs() <= 0.8 + 1e-6));
        }
    }
}

#[test]
fn edit_rejected_by_full_queue_is_not_half_applied() {
    let (mut controller, mut engine) = player::link(PwmParams::new(), SAMPLE_RATE, 1);
    let mut out = vec![0.0f32; 960];

    controller.play().unwrap();
    assert_eq!(
        controller.edit(ParamEdit::Duty(50.0)),
        Err(ControlError::QueueFull)
    );
    assert_eq!(controller.params().display_value(Field::Duty), 7.5);

    engine.render(&mut out, 1);
    assert_eq!(out.iter().filter(|&&s| s == 1.0).count(), 72);

    // Retrying the same value now reaches the speaker
    controller.edit(ParamEdit::Duty(50.0)).unwrap();
    engine.render(&mut out, 1);
    assert_eq!(out.iter().filter(|&&s| s == 1.0).count(), 480);
}

#[test]
fn replaced_loops_return_to_the_controller() {
    let (mut controller, mut engine) = player::link(PwmParams::new(), SAMPLE_RATE, 4);
    let mut out = vec![0.0f32; 64];

    controller.play().unwrap();
    engine.render(&mut out, 1);
    for duty in [10.0, 20.0, 30.0] {
        controller.edit(ParamEdit::Duty(duty)).unwrap();
        engine.render(&mut out, 1);
    }
    controller.stop().unwrap();
    engine.render(&mut out, 1);

    // Earlier loops were freed as each later command went out
    assert_eq!(controller.reclaim(), 1);
    assert_eq!(controller.reclaim(), 0);
    assert_eq!(engine.status().loop_frames, 0);
}
