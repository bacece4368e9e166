// Help bar: key hints for the current mode and page.

use cff_app::view::KeyHint;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ViewState;

const GLOBAL: &str = " q:Quit | 1-4:Pages";
const FORM: &str = " Enter:Submit | Tab:Next field | Esc:Cancel";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn help_text(state: &ViewState) -> String {
    if state.form.is_some() {
        return FORM.to_string();
    }
    let hints: &[KeyHint] = state.page.as_ref().map(|p| p.hints.as_slice()).unwrap_or(&[]);
    let mut text = GLOBAL.to_string();
    for hint in hints {
        text.push_str(&format!(" | {}:{}", hint.key, hint.label));
    }
    text
}
