// Page body: the view's sections stacked vertically, each in its own block.

use cff_app::view::{Field, PageView, Row, Section, SectionBody};
use ratatui::layout::{Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use super::tone_color;
use crate::layout::section_constraints;

pub fn render(frame: &mut Frame, area: Rect, view: Option<&PageView>) {
    let Some(view) = view else {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, area);
        return;
    };

    let heights: Vec<Option<u16>> = view.sections.iter().map(section_height).collect();
    let areas = Layout::vertical(section_constraints(&heights)).split(area);

    for (section, rect) in view.sections.iter().zip(areas.iter()) {
        render_section(frame, *rect, section);
    }
}

/// Fixed height for message and field sections (borders included); `None`
/// lets list sections take the remaining space.
fn section_height(section: &Section) -> Option<u16> {
    match &section.body {
        SectionBody::Message(_) => Some(3),
        SectionBody::Fields(fields) => Some(fields.len() as u16 + 2),
        SectionBody::Rows(_) => None,
    }
}

fn render_section(frame: &mut Frame, area: Rect, section: &Section) {
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        format!(" {} ", section.title),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    match &section.body {
        SectionBody::Message(message) => {
            let paragraph = Paragraph::new(message.text.clone())
                .style(Style::default().fg(tone_color(message.tone)))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, area);
        }
        SectionBody::Fields(fields) => {
            let lines: Vec<Line> = fields.iter().map(field_line).collect();
            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
        SectionBody::Rows(rows) => {
            let width = area.width.saturating_sub(2) as usize;
            let items: Vec<ListItem> = rows.iter().map(|r| row_item(r, width)).collect();
            frame.render_widget(List::new(items).block(block), area);
        }
    }
}

pub fn field_line(field: &Field) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", field.label), Style::default().fg(Color::Gray)),
        Span::styled(field.value.clone(), Style::default().fg(Color::White)),
    ])
}

/// Headline (with the trailing value right-aligned) and a muted detail line.
pub fn row_item(row: &Row, width: usize) -> ListItem<'static> {
    let mut headline = vec![Span::styled(
        row.primary.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(trailing) = &row.trailing {
        let used = row.primary.chars().count() + trailing.chars().count();
        let gap = width.saturating_sub(used).max(1);
        headline.push(Span::raw(" ".repeat(gap)));
        headline.push(Span::styled(
            trailing.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut lines = vec![Line::from(headline)];
    if let Some(secondary) = &row.secondary {
        lines.push(Line::from(Span::styled(
            secondary.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    ListItem::new(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cff_app::protocol::PageId;
    use cff_app::view::{KeyHint, NavView, Tone};

    fn sample_view() -> PageView {
        PageView {
            page: PageId::Home,
            nav: NavView {
                label: "Sign in".into(),
                signed_in: false,
            },
            sections: vec![
                Section::rows(
                    "Live scores",
                    vec![Row {
                        primary: "BAMA @ UGA".into(),
                        secondary: Some("Q3 - 07:42".into()),
                        trailing: Some("17 - 21".into()),
                    }],
                ),
                Section::message("Player search", "No players found.", Tone::Muted),
                Section::fields("Your league", vec![Field::new("Name", "Saturday Legends")]),
            ],
            hints: vec![KeyHint::new("/", "search")],
        }
    }

    fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_every_section() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let view = sample_view();
        terminal
            .draw(|frame| render(frame, frame.area(), Some(&view)))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("BAMA @ UGA"));
        assert!(text.contains("17 - 21"));
        assert!(text.contains("No players found."));
        assert!(text.contains("Saturday Legends"));
    }

    #[test]
    fn renders_placeholder_without_view() {
        let backend = ratatui::backend::TestBackend::new(40, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), None))
            .unwrap();
        assert!(buffer_text(&terminal).contains("Loading..."));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(10, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let view = sample_view();
        terminal
            .draw(|frame| render(frame, frame.area(), Some(&view)))
            .unwrap();
    }

    #[test]
    fn row_item_pads_trailing_value() {
        let row = Row {
            primary: "A @ B".into(),
            secondary: None,
            trailing: Some("1 - 0".into()),
        };
        let item = row_item(&row, 20);
        assert_eq!(item.height(), 1);
    }
}
