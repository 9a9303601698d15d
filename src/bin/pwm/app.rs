//! PwmApp - audio device setup and application runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{PushError, RingBuffer};

use pwm_player::{
    player::{self, PlayerStatus},
    PwmParams,
};

use super::ui::{DeviceInfo, UiApp, VIS_BUFFER_SIZE};

/// Capacity of the control -> audio command ring (and of the loop return ring)
const COMMAND_RING_LEN: usize = 16;
/// Capacity in visualization windows for the audio -> UI sample ring
const AUDIO_RING_BLOCKS: usize = 4;

/// Main application builder
pub struct PwmApp {
    params: PwmParams,
    gain: f32,
    autoplay: bool,
    device: Option<String>,
}

impl PwmApp {
    pub fn new() -> Self {
        Self {
            params: PwmParams::new(),
            gain: 1.0,
            autoplay: false,
            device: None,
        }
    }

    /// Initial generator parameters
    pub fn params(mut self, params: PwmParams) -> Self {
        self.params = params;
        self
    }

    /// Master output gain (0.0-1.0)
    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Start playing as soon as the UI opens
    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Output device by name; `None` picks the host default
    pub fn device(mut self, device: Option<String>) -> Self {
        self.device = device;
        self
    }

    /// Open the audio stream and run the TUI until the user quits
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = match &self.device {
            Some(name) => host
                .output_devices()
                .wrap_err("failed to enumerate output devices")?
                .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
                .ok_or_else(|| eyre!("no output device named {name:?}"))?,
            None => host
                .default_output_device()
                .ok_or_else(|| eyre!("no default output device available"))?,
        };
        let device_name = device.name().unwrap_or_else(|_| "(no name)".to_string());
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        log::info!(
            "output device: {device_name}, {sample_rate} Hz, {channels} channel(s), {}",
            config.sample_format()
        );

        // --- Cross-thread rings ---
        let (mut controller, engine) = player::link(self.params, sample_rate, COMMAND_RING_LEN);
        let (audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);
        let (status_tx, status_rx) = RingBuffer::<PlayerStatus>::new(32);

        let stream = device
            .build_output_stream(
                &config.into(),
                {
                    let mut engine = engine.with_gain(self.gain);
                    let mut audio_tx = audio_tx;
                    let mut status_tx = status_tx;
                    move |data: &mut [f32], _| {
                        engine.render(data, channels);

                        // Tap the first channel for the scope, drop on overflow
                        for &s in data.iter().step_by(channels.max(1)) {
                            if let Err(PushError::Full(_)) = audio_tx.push(s) {
                                break;
                            }
                        }

                        let _ = status_tx.push(engine.status());
                    }
                },
                |err| log::error!("stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        if self.autoplay {
            controller.play()?;
        }

        let info = DeviceInfo {
            name: device_name,
            sample_rate,
            channels,
            gain: self.gain.clamp(0.0, 1.0),
        };
        let mut ui = UiApp::new(controller, audio_rx, status_rx, info);

        let mut terminal = ratatui::init();
        let result = ui.run(&mut terminal);
        ratatui::restore();

        // Dropping the stream closes the device
        drop(stream);
        result
    }
}

impl Default for PwmApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Print the host's output devices, marking the default
pub fn list_output_devices() -> EyreResult<()> {
    let host = cpal::default_host();
    let default_name = host.default_output_device().and_then(|d| d.name().ok());

    println!("Output devices ({}):", host.id().name());
    for device in host
        .output_devices()
        .wrap_err("failed to enumerate output devices")?
    {
        let name = device.name().unwrap_or_else(|_| "(no name)".to_string());
        let marker = if Some(&name) == default_name.as_ref() { "*" } else { " " };
        match device.default_output_config() {
            Ok(config) => println!(
                " {marker} {name}  ({} Hz, {} ch)",
                config.sample_rate().0,
                config.channels()
            ),
            Err(_) => println!(" {marker} {name}"),
        }
    }
    Ok(())
}
