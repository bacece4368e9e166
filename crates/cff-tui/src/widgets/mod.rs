// Widgets for each screen region.

pub mod form_popup;
pub mod help_bar;
pub mod page;
pub mod quit_confirm;
pub mod status_bar;

use ratatui::style::Color;

use cff_app::view::Tone;

/// Foreground color for a message tone.
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Normal => Color::White,
        Tone::Muted => Color::Gray,
        Tone::Success => Color::Green,
        Tone::Error => Color::LightRed,
    }
}
