// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into `UserCommand`s for the app
// orchestrator, or into local `ViewState` changes (opening and editing
// forms, the quit dialog).

use cff_app::protocol::{AuthKind, PageId, UserCommand};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::form::Form;
use crate::ViewState;

/// Handle any terminal event. Focus regain is the terminal's visibility
/// change: the app re-reads the shared store for the visible page.
pub fn handle_event(event: Event, view_state: &mut ViewState) -> Option<UserCommand> {
    match event {
        Event::Key(key_event) => handle_key(key_event, view_state),
        Event::FocusGained => Some(UserCommand::Resync),
        _ => None,
    }
}

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should go to the app
/// orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports releases too on some platforms
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.form.is_some() {
        return handle_form(key_event, view_state);
    }

    let page = view_state.active_page();
    match key_event.code {
        KeyCode::Char(c @ '1'..='4') => c
            .to_digit(10)
            .and_then(PageId::from_number)
            .map(UserCommand::SwitchPage),

        KeyCode::Char('/') if matches!(page, PageId::Home | PageId::Players) => {
            view_state.form = Some(Form::search());
            None
        }
        KeyCode::Char('l') if page == PageId::SignIn => {
            view_state.form = Some(Form::auth(AuthKind::LogIn));
            None
        }
        KeyCode::Char('u') if page == PageId::SignIn => {
            view_state.form = Some(Form::auth(AuthKind::SignUp));
            None
        }
        KeyCode::Char('e') if page == PageId::League => {
            view_state.form = Some(Form::create_league());
            None
        }

        KeyCode::Char('v') if page == PageId::SignIn => Some(UserCommand::ValidateSession),
        KeyCode::Char('c') if page == PageId::League => Some(UserCommand::ClearLeague),
        KeyCode::Char('p') if page == PageId::Players => Some(UserCommand::CyclePosition),
        KeyCode::Char('s') if view_state.signed_in() => Some(UserCommand::SignOut),
        KeyCode::Char('r') => Some(UserCommand::Refresh),

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Typing into the open form. Enter submits; an invalid form stays open
/// with its error shown.
fn handle_form(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = view_state.form.as_mut()?;
    match key_event.code {
        KeyCode::Esc => {
            view_state.form = None;
            None
        }
        KeyCode::Enter => match form.submit() {
            Ok(cmd) => {
                view_state.form = None;
                Some(cmd)
            }
            Err(message) => {
                form.error = Some(message);
                None
            }
        },
        KeyCode::Tab | KeyCode::Down => {
            form.next_field();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.prev_field();
            None
        }
        KeyCode::Backspace => {
            form.pop();
            None
        }
        KeyCode::Char(c) => {
            form.push(c);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
