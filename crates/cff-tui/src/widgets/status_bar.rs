// Status bar widget: page tabs on the left, navigation label on the right.

use cff_app::protocol::PageId;
use cff_app::view::NavView;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let nav = nav_spans(state.page.as_ref().map(|p| &p.nav));
    let nav_width: u16 = nav.iter().map(|s| s.width() as u16).sum();
    let [tabs_area, nav_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(nav_width)]).areas(area);

    let tabs = Paragraph::new(Line::from(tab_spans(state.active_page())))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(tabs, tabs_area);

    let nav = Paragraph::new(Line::from(nav)).style(Style::default().bg(Color::Black));
    frame.render_widget(nav, nav_area);
}

/// "[1:Home] [2:Sign in] [3:League] [4:Players]" with the active page
/// highlighted.
pub fn tab_spans(active: PageId) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for page in PageId::ALL {
        let style = if page == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", page.index() + 1, page.label()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

/// The nav affordance: the signed-in label in green, or `Sign in`.
pub fn nav_spans(nav: Option<&NavView>) -> Vec<Span<'static>> {
    match nav {
        Some(nav) if nav.signed_in => vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::styled(
                nav.label.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ],
        Some(nav) => vec![
            Span::styled(nav.label.clone(), Style::default().fg(Color::Gray)),
            Span::raw(" "),
        ],
        None => vec![Span::raw(" ")],
    }
}
