//! pwm - Terminal PWM square wave generator
//!
//! Run with: cargo run -- --frequency 440 --duty 25 --play

mod app;
mod ui;

use std::{fs::File, path::PathBuf};

use app::PwmApp;
use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use pwm_player::{ParamEdit, PwmParams};

#[derive(Parser)]
#[command(name = "pwm")]
#[command(about = "Play a pulse-width-modulated square wave through the default audio output")]
struct Cli {
    /// Period length in microseconds
    #[arg(long, conflicts_with = "frequency")]
    period_us: Option<f64>,
    /// Frequency in Hz
    #[arg(short, long)]
    frequency: Option<f64>,
    /// Pulse length in microseconds
    #[arg(long, conflicts_with = "duty")]
    pulse_us: Option<f64>,
    /// Duty cycle in percent
    #[arg(short, long)]
    duty: Option<f64>,
    /// Phase-invert the right channel
    #[arg(short, long)]
    invert: bool,
    /// Shift levels so the waveform has zero mean
    #[arg(long)]
    dc_cut: bool,
    /// Output gain, 0.0 to 1.0
    #[arg(short, long, default_value_t = 1.0, value_parser = parse_gain)]
    gain: f32,
    /// Start playing immediately
    #[arg(short, long)]
    play: bool,
    /// Output device name (defaults to the system default)
    #[arg(long)]
    device: Option<String>,
    /// List output devices and exit
    #[arg(long)]
    list_devices: bool,
    /// Write log records to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Starting parameters: period, then frequency, then pulse, then duty
    fn params(&self) -> EyreResult<PwmParams> {
        let mut params = PwmParams::new()
            .with_inverted(self.invert)
            .with_dc_cut(self.dc_cut);
        let edits = [
            self.period_us.map(ParamEdit::Period),
            self.frequency.map(ParamEdit::Frequency),
            self.pulse_us.map(ParamEdit::Pulse),
            self.duty.map(ParamEdit::Duty),
        ];
        for edit in edits.into_iter().flatten() {
            params.apply(edit).wrap_err("invalid starting parameters")?;
        }
        Ok(params)
    }
}

fn parse_gain(s: &str) -> Result<f32, String> {
    let gain: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&gain) {
        Ok(gain)
    } else {
        Err(format!("gain must be between 0.0 and 1.0, got {s}"))
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> EyreResult<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // stderr shares the terminal with the TUI, so stay quiet unless asked
        None => env_logger::init(),
    }
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    if cli.list_devices {
        return app::list_output_devices();
    }

    PwmApp::new()
        .params(cli.params()?)
        .gain(cli.gain)
        .autoplay(cli.play)
        .device(cli.device.clone())
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_and_duty_flags() {
        let cli = Cli::parse_from(["pwm", "--frequency", "1000", "--duty", "25", "--invert"]);
        let params = cli.params().unwrap();
        assert_eq!(params.period_us(), 1_000.0);
        assert_eq!(params.pulse_us(), 250.0);
        assert!(params.inverted());
        assert!(!params.dc_cut());
    }

    #[test]
    fn period_and_pulse_flags() {
        let cli = Cli::parse_from(["pwm", "--period-us", "2000", "--pulse-us", "500", "--dc-cut"]);
        let params = cli.params().unwrap();
        assert_eq!(params.period_us(), 2_000.0);
        assert_eq!(params.pulse_us(), 500.0);
        assert!(params.dc_cut());
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        assert!(Cli::try_parse_from(["pwm", "--period-us", "2000", "--frequency", "50"]).is_err());
        assert!(Cli::try_parse_from(["pwm", "--pulse-us", "500", "--duty", "50"]).is_err());
    }

    #[test]
    fn non_finite_values_are_reported() {
        let cli = Cli::parse_from(["pwm", "--frequency", "NaN"]);
        assert!(cli.params().is_err());
        let cli = Cli::parse_from(["pwm", "--pulse-us", "inf"]);
        assert!(cli.params().is_err());
    }

    #[test]
    fn gain_outside_unit_range_is_rejected() {
        assert!(Cli::try_parse_from(["pwm", "--gain", "NaN"]).is_err());
        assert!(Cli::try_parse_from(["pwm", "--gain", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["pwm", "--gain", "-0.1"]).is_err());
        let cli = Cli::try_parse_from(["pwm", "--gain", "0.5"]).unwrap();
        assert_eq!(cli.gain, 0.5);
    }
}
