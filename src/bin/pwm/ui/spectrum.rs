//! Spectrum analyzer widget
//!
//! FFT-based view of the output with log-spaced bands. A pulse wave puts
//! energy at every multiple of the fundamental except those where the duty
//! cycle makes the harmonic vanish (every even one at 50 %).

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of frequency bands to display
const SPECTRUM_BANDS: usize = 96;
/// Floor of the display range in dB
const FLOOR_DB: f64 = -100.0;

/// Spectrum analyzer with FFT processing
pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// Centre frequency of each band (Hz)
    band_freqs: Vec<f64>,
    /// FFT bin range `[start, end)` covered by each band (edges inclusive)
    band_bins: Vec<(usize, usize)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Current spectrum data: (log10 frequency, magnitude_db)
    spectrum: Vec<(f64, f64)>,
}

/// Log-spaced band edges between 20 Hz and min(20 kHz, Nyquist), mapped to FFT bins.
///
/// Every band covers at least one bin.
fn band_layout(buffer_len: usize, sample_rate: f32, bands: usize) -> (Vec<f64>, Vec<(usize, usize)>) {
    let half = (buffer_len / 2).max(1);
    let max_freq = (sample_rate as f64 / 2.0).min(20_000.0).max(1.0);
    let min_freq = 20.0f64.min(max_freq);
    let ratio = max_freq / min_freq;
    let bin_hz = sample_rate as f64 / buffer_len.max(1) as f64;

    let edge = |i: usize| min_freq * ratio.powf(i as f64 / bands as f64);
    let to_bin = |freq: f64| ((freq / bin_hz).round() as usize).min(half - 1);

    let mut freqs = Vec::with_capacity(bands);
    let mut bins = Vec::with_capacity(bands);
    for i in 0..bands {
        let (lo, hi) = (edge(i), edge(i + 1));
        let start = to_bin(lo);
        let end = (to_bin(hi) + 1).min(half).max(start + 1);
        freqs.push((lo * hi).sqrt());
        bins.push((start, end));
    }
    (freqs, bins)
}

impl SpectrumAnalyzer {
    /// Create a new spectrum analyzer
    ///
    /// # Arguments
    /// * `buffer_len` - FFT size (should match audio buffer length)
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        // Hann window - reduces spectral leakage
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        let (band_freqs, band_bins) = band_layout(buffer_len, sample_rate, SPECTRUM_BANDS);
        let spectrum = band_freqs.iter().map(|&f| (f.log10(), FLOOR_DB)).collect();

        Self {
            window,
            band_freqs,
            band_bins,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    /// Update the spectrum from new audio samples
    ///
    /// Buffers of the wrong length are ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for (i, sample) in buffer.iter().enumerate() {
            self.scratch[i].re = *sample * self.window[i];
            self.scratch[i].im = 0.0;
        }

        self.fft.process(&mut self.scratch);

        // Normalise so a full-scale sine peaks near 0 dB
        let norm = (buffer.len() as f32 / 4.0).powi(2);
        for (i, &(start, end)) in self.band_bins.iter().enumerate() {
            let power = self.scratch[start..end]
                .iter()
                .map(|bin| (bin.re * bin.re + bin.im * bin.im) / norm)
                .fold(1e-12f32, f32::max);
            self.spectrum[i] = (
                self.band_freqs[i].log10(),
                (10.0 * (power as f64).log10()).max(FLOOR_DB),
            );
        }
    }

    /// Get the current spectrum data
    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum analyzer widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let min_x = spectrum.first().map(|(f, _)| *f).unwrap_or(1.0);
    let max_x = spectrum.last().map(|(f, _)| *f).unwrap_or(4.3).max(min_x + 0.1);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_cover_at_least_one_bin() {
        let (freqs, bins) = band_layout(4096, 48_000.0, SPECTRUM_BANDS);
        assert_eq!(freqs.len(), SPECTRUM_BANDS);
        for &(start, end) in &bins {
            assert!(end > start);
            assert!(end <= 2048);
        }
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn square_wave_fundamental_stands_out() {
        let sample_rate = 48_000.0;
        let len = 4096;
        // 50% duty at 750 Hz: 64 samples per period
        let buffer: Vec<f32> = (0..len)
            .map(|i| if i % 64 < 32 { 1.0 } else { -1.0 })
            .collect();
        let mut analyzer = SpectrumAnalyzer::new(len, sample_rate);
        analyzer.update(&buffer);

        let level_at = |hz: f64| {
            analyzer
                .data()
                .iter()
                .min_by(|a, b| {
                    (a.0 - hz.log10())
                        .abs()
                        .partial_cmp(&(b.0 - hz.log10()).abs())
                        .unwrap()
                })
                .map(|&(_, db)| db)
                .unwrap()
        };
        let fundamental = level_at(750.0);
        assert!(fundamental > -10.0, "fundamental at {fundamental} dB");
        assert!(fundamental > level_at(100.0) + 40.0);
    }
}
