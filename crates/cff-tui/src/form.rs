// Text-entry forms: player search, log in, sign up and create league.
//
// A form is open while the user is typing. Submitting turns its fields into
// a `UserCommand`; local validation errors keep the form open.

use cff_app::protocol::{AuthKind, UserCommand};
use cff_core::api::NewLeague;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Search,
    LogIn,
    SignUp,
    CreateLeague,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            FormKind::Search => "Search players",
            FormKind::LogIn => "Log in",
            FormKind::SignUp => "Sign up",
            FormKind::CreateLeague => "Create league",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Rendered masked.
    pub secret: bool,
}

impl FormField {
    fn text(label: &'static str, value: &str) -> Self {
        FormField {
            label,
            value: value.to_string(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        FormField {
            label,
            value: String::new(),
            secret: true,
        }
    }

    /// What the field shows on screen.
    pub fn display(&self) -> String {
        if self.secret {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
}

impl Form {
    fn with_fields(kind: FormKind, fields: Vec<FormField>) -> Self {
        Form {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn search() -> Self {
        Self::with_fields(FormKind::Search, vec![FormField::text("Name", "")])
    }

    pub fn auth(kind: AuthKind) -> Self {
        let form_kind = match kind {
            AuthKind::LogIn => FormKind::LogIn,
            AuthKind::SignUp => FormKind::SignUp,
        };
        Self::with_fields(
            form_kind,
            vec![FormField::text("Email", ""), FormField::secret("Password")],
        )
    }

    /// Pre-filled with the server's defaults.
    pub fn create_league() -> Self {
        let defaults = NewLeague::default();
        Self::with_fields(
            FormKind::CreateLeague,
            vec![
                FormField::text("Name", &defaults.name),
                FormField::text("Teams", &defaults.teams.to_string()),
                FormField::text("Scoring", &defaults.scoring),
                FormField::text("Draft type", &defaults.draft_type),
                FormField::text("Notes", &defaults.notes),
            ],
        )
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
        self.error = None;
    }

    pub fn pop(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
        self.error = None;
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Turn the form into a command, or explain what is wrong with it.
    pub fn submit(&self) -> Result<UserCommand, String> {
        match self.kind {
            FormKind::Search => Ok(UserCommand::Search(self.value(0).trim().to_string())),
            FormKind::LogIn | FormKind::SignUp => {
                let kind = if self.kind == FormKind::LogIn {
                    AuthKind::LogIn
                } else {
                    AuthKind::SignUp
                };
                Ok(UserCommand::Auth {
                    kind,
                    email: self.value(0).trim().to_string(),
                    password: self.value(1).to_string(),
                })
            }
            FormKind::CreateLeague => self.new_league().map(UserCommand::CreateLeague),
        }
    }

    /// Blank fields fall back to the server's defaults; scoring and draft
    /// type are passed through as typed.
    fn new_league(&self) -> Result<NewLeague, String> {
        let defaults = NewLeague::default();
        let or_default = |value: &str, default: String| {
            let value = value.trim();
            if value.is_empty() {
                default
            } else {
                value.to_string()
            }
        };

        let teams = match self.value(1).trim() {
            "" => defaults.teams,
            raw => raw
                .parse::<u32>()
                .map_err(|_| "Teams must be a whole number.".to_string())?,
        };

        Ok(NewLeague {
            name: or_default(self.value(0), defaults.name),
            teams,
            scoring: or_default(self.value(2), defaults.scoring),
            draft_type: or_default(self.value(3), defaults.draft_type),
            notes: self.value(4).trim().to_string(),
        })
    }
}
