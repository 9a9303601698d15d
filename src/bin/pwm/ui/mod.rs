//! TUI module for pwm
//!
//! Parameter form plus real-time visualization of the audio output.

mod form;
mod panel;
mod spectrum;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use pwm_player::{
    player::{ControlError, PlayerStatus, RingController},
    ParamEdit,
};

use form::Form;
use panel::render_panel;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size (also the FFT size)
pub const VIS_BUFFER_SIZE: usize = 4096;

/// Static facts about the open output device
#[derive(Clone, Debug)]
pub struct DeviceInfo {
    pub name: String,
    pub sample_rate: f32,
    pub channels: usize,
    pub gain: f32,
}

/// UI application state
pub struct UiApp {
    /// Owns the parameters and sends loops to the audio thread
    controller: RingController,
    /// Ring buffer receiver for output samples (first channel)
    audio_rx: Consumer<f32>,
    /// Ring buffer receiver for engine status
    status_rx: Consumer<PlayerStatus>,
    /// Latest engine status
    status: PlayerStatus,
    info: DeviceInfo,
    /// Most recent output samples for the scope and analyzer
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    form: Form,
    /// Last error shown in the status line
    message: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controller: RingController,
        audio_rx: Consumer<f32>,
        status_rx: Consumer<PlayerStatus>,
        info: DeviceInfo,
    ) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, info.sample_rate);
        Self {
            controller,
            audio_rx,
            status_rx,
            status: PlayerStatus::default(),
            info,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            form: Form::new(),
            message: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();
            self.controller.reclaim();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        let mut new_samples = Vec::new();
        while let Ok(sample) = self.audio_rx.pop() {
            new_samples.push(sample);
        }

        if !new_samples.is_empty() {
            // Append new samples and keep only the last VIS_BUFFER_SIZE
            self.audio_buffer.extend(new_samples);
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
            self.spectrum.update(&self.audio_buffer);
        }
    }

    /// Keep only the latest engine status
    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
        let params = *self.controller.params();

        if self.form.is_entering() {
            match key.code {
                KeyCode::Char(c) => {
                    self.form.input_char(c);
                }
                KeyCode::Backspace => self.form.backspace(),
                KeyCode::Enter => match self.form.commit() {
                    Ok(Some(edit)) => self.apply(edit),
                    Ok(None) => {}
                    Err(err) => self.message = Some(err.to_string()),
                },
                KeyCode::Esc => self.form.cancel(),
                KeyCode::Up => self.form.select_prev(),
                KeyCode::Down | KeyCode::Tab => self.form.select_next(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                let result = self.controller.toggle();
                self.report(result);
            }
            KeyCode::Up | KeyCode::Char('k') => self.form.select_prev(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.form.select_next(),
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(edit) = self.form.step(&params, -1.0, coarse) {
                    self.apply(edit);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(edit) = self.form.step(&params, 1.0, coarse) {
                    self.apply(edit);
                }
            }
            KeyCode::Enter => {
                if let Some(edit) = self.form.toggle(&params) {
                    self.apply(edit);
                }
            }
            KeyCode::Char('i') => self.apply(ParamEdit::Inverted(!params.inverted())),
            KeyCode::Char('d') => self.apply(ParamEdit::DcCut(!params.dc_cut())),
            KeyCode::Char(c) => {
                self.form.input_char(c);
            }
            _ => {}
        }
    }

    fn apply(&mut self, edit: ParamEdit) {
        let result = self.controller.edit(edit);
        self.report(result);
    }

    fn report(&mut self, result: Result<(), ControlError>) {
        self.message = result.err().map(|err| err.to_string());
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: transport, form + scope, spectrum, status
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Transport bar
                Constraint::Min(10),    // Form and oscilloscope
                Constraint::Length(10), // Spectrum
                Constraint::Length(1),  // Status / help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(
            frame,
            chunks[0],
            &self.controller,
            &self.status,
            &self.info,
            &stats,
        );

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(20)])
            .split(chunks[1]);
        render_panel(frame, middle[0], &self.form, self.controller.params());
        render_waveform(frame, middle[1], &self.audio_buffer, self.status.loop_frames);

        render_spectrum(frame, chunks[2], self.spectrum.data());

        let status_line = match &self.message {
            Some(message) => Paragraph::new(format!(" {message}"))
                .style(Style::default().fg(Color::Red)),
            None => Paragraph::new(
                " [Space] Play/Stop  [↑↓] Field  [←→] Step (Shift x10)  [0-9] Type  [Enter] Set/Toggle  [i] Invert  [d] DC cut  [Q] Quit",
            )
            .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(status_line, chunks[3]);
    }
}
