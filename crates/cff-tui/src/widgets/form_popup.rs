// Form overlay: a centered dialog with one line per field.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::form::Form;
use crate::layout::centered_rect;

const DIALOG_WIDTH: u16 = 56;

pub fn render(frame: &mut Frame, area: Rect, form: &Form) {
    let lines = form_lines(form);
    let height = lines.len() as u16 + 2;
    let dialog = centered_rect(DIALOG_WIDTH, height, area);

    frame.render_widget(Clear, dialog);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", form.kind.title()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog);
}

pub fn form_lines(form: &Form) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };
            let mut value = field.display();
            if focused {
                value.push('_');
            }
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:<11}", field.label), Style::default().fg(Color::Gray)),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::LightRed),
        )));
    }
    lines
}
