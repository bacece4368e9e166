// Screen layout:
//
// +--------------------------------------------------+
// | Status Bar (1 row): page tabs, nav label          |
// +--------------------------------------------------+
// | Page sections (fill)                              |
// |                                                   |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// Forms and the quit dialog are drawn as overlays on top.

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub main_panel: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(3),    // page
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        help_bar: vertical[2],
    }
}

/// Heights for stacking page sections: message sections get a fixed small
/// height, list sections share what is left.
pub fn section_constraints(heights: &[Option<u16>]) -> Vec<Constraint> {
    heights
        .iter()
        .map(|h| match h {
            Some(rows) => Constraint::Length(*rows),
            None => Constraint::Fill(1),
        })
        .collect()
}

/// A rectangle of the given size centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fills_area() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = build_layout(area);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 28);
        assert_eq!(layout.help_bar.y, 29);
    }

    #[test]
    fn centered_rect_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(40, 10, area);
        assert_eq!((rect.width, rect.height), (40, 10));
        assert_eq!(rect.x, 20);
        assert_eq!(rect.y, 7);

        let small = centered_rect(200, 50, area);
        assert_eq!((small.width, small.height), (80, 24));
    }

    #[test]
    fn section_constraints_mix_fixed_and_fill() {
        let constraints = section_constraints(&[Some(3), None, Some(4)]);
        assert_eq!(
            constraints,
            vec![Constraint::Length(3), Constraint::Fill(1), Constraint::Length(4)]
        );
    }
}
