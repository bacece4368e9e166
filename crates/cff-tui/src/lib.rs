// Terminal front end: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the last `PageView` the app published
// plus purely local UI state (open form, quit dialog). The app orchestrator
// pushes `UiUpdate` messages over an mpsc channel; the TUI applies them and
// re-renders at ~30 fps.

pub mod form;
pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use cff_app::protocol::{PageId, UiUpdate, UserCommand};
use cff_app::view::PageView;
use crossterm::event::{DisableFocusChange, EnableFocusChange, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::warn;

use form::Form;
use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state used for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Last view published by the app; `None` until the first page loads.
    pub page: Option<PageView>,
    /// Form being edited, if any. Keys go to the form while it is open.
    pub form: Option<Form>,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl ViewState {
    pub fn active_page(&self) -> PageId {
        self.page.as_ref().map(|p| p.page).unwrap_or(PageId::Home)
    }

    pub fn signed_in(&self) -> bool {
        self.page.as_ref().is_some_and(|p| p.nav.signed_in)
    }
}

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Page(view) => {
            // A form opened for one page makes no sense on another.
            if state.page.as_ref().is_some_and(|p| p.page != view.page) {
                state.form = None;
            }
            state.page = Some(*view);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame: status bar, page body, help bar, and any
/// overlay on top.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::page::render(frame, layout.main_panel, state.page.as_ref());
    widgets::help_bar::render(frame, layout.help_bar, state);

    if let Some(form) = &state.form {
        widgets::form_popup::render(frame, frame.area(), form);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI until the user quits or the app closes `ui_rx`.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    // Focus events stand in for page visibility changes.
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableFocusChange) {
        warn!("Terminal focus reporting unavailable: {}", e);
    }

    // Restore the terminal before the default hook prints the panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::execute!(std::io::stdout(), DisableFocusChange);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(event)) => {
                        if let Some(cmd) = input::handle_event(event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() || quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break Err(e.into());
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    let _ = crossterm::execute!(std::io::stdout(), DisableFocusChange);
    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
