//! Parameter panel widget - the editable form rows

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pwm_player::PwmParams;

use super::form::{Form, FormField};

/// Render the form, highlighting the selected row
pub fn render_panel(frame: &mut Frame, area: Rect, form: &Form, params: &PwmParams) {
    let block = Block::default()
        .title(" Parameters ")
        .borders(Borders::ALL);

    let mut lines = Vec::with_capacity(FormField::ALL.len() + 1);
    for field in FormField::ALL {
        let selected = field == form.selected();

        let value = match form.entry() {
            Some(entry) if selected => format!("{entry}_"),
            _ => field.value_text(params),
        };

        let label_style = if selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        let value_style = if selected && form.is_entering() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {:<22}", field.label()), label_style),
            Span::styled(format!("{value:>10}"), value_style),
            Span::styled(format!(" {}", field.unit()), Style::default().fg(Color::DarkGray)),
        ]));

        // Visual break between the numeric rows and the checkboxes
        if field == FormField::Duty {
            lines.push(Line::raw(""));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
