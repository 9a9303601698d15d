//! Waveform oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Shortest window shown, in samples
const MIN_WINDOW: usize = 64;

/// Number of trailing samples to show: two loop periods when a loop is known
fn window_len(buffer_len: usize, loop_frames: usize) -> usize {
    if loop_frames == 0 {
        return buffer_len;
    }
    (loop_frames * 2).clamp(MIN_WINDOW.min(buffer_len), buffer_len)
}

/// Render the waveform oscilloscope
pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32], loop_frames: usize) {
    let block = Block::default()
        .title(" Output (left) ")
        .borders(Borders::ALL);

    let window = window_len(audio_buffer.len(), loop_frames);
    let samples = &audio_buffer[audio_buffer.len() - window..];

    // Downsample to roughly two points per braille column
    let target = (area.width.max(1) as usize) * 2;
    let step = samples.len().div_ceil(target).max(1);
    let data: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, &sample)| (i as f64 / window.max(1) as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.1, 1.1])
                .labels(vec!["-1", "0", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
