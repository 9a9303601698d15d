//! Transport bar widget - shows play state, signal, device and output stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pwm_player::player::{MessageSender, PlayerStatus, PwmController, RetiredReceiver};

use super::DeviceInfo;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
    /// Mean sample value; near zero when DC cut is on
    pub dc: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self {
                peak: 0.0,
                rms: 0.0,
                dc: 0.0,
            };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        let dc = (buffer.iter().map(|&x| x as f64).sum::<f64>() / buffer.len() as f64) as f32;
        Self { peak, rms, dc }
    }
}

/// Render the transport bar
pub fn render_transport<S: MessageSender, C: RetiredReceiver>(
    frame: &mut Frame,
    area: Rect,
    controller: &PwmController<S, C>,
    status: &PlayerStatus,
    info: &DeviceInfo,
    audio_stats: &AudioStats,
) {
    let block = Block::default()
        .title(format!(" pwm - {} ", info.name))
        .borders(Borders::ALL);

    let params = controller.params();
    let playing = controller.is_playing();
    let play_symbol = if playing { "▶" } else { "■" };
    let play_state_str = match (playing, status.loop_frames) {
        (false, _) => "Stopped",
        (true, 0) => "Silent",
        (true, _) => "Playing",
    };

    // Frequency after the period is rounded to whole samples
    let actual = if status.loop_frames > 0 {
        format!("actual {:.2} Hz  ", info.sample_rate / status.loop_frames as f32)
    } else {
        String::new()
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", play_symbol, play_state_str),
            Style::default().fg(if playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(
            format!(
                "{:.1} Hz  {:.1} %  ",
                params.frequency_hz(),
                params.duty_percent()
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(actual, Style::default().fg(Color::White)),
        Span::styled(
            format!(
                "loop {} x{}  ",
                status.loop_frames, status.loop_channels
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "{:.1}kHz {}ch gain {:.2}  ",
                info.sample_rate / 1000.0,
                info.channels,
                info.gain
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Peak: {:.2}  RMS: {:.2}  DC: {:+.3}",
                audio_stats.peak, audio_stats.rms, audio_stats.dc
            ),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_asymmetric_pulse() {
        // 1 high, 3 low
        let stats = AudioStats::from_buffer(&[1.0, -1.0, -1.0, -1.0]);
        assert_eq!(stats.peak, 1.0);
        assert_eq!(stats.rms, 1.0);
        assert_eq!(stats.dc, -0.5);
    }

    #[test]
    fn stats_of_empty_buffer() {
        let stats = AudioStats::from_buffer(&[]);
        assert_eq!(stats.peak, 0.0);
        assert_eq!(stats.dc, 0.0);
    }
}
