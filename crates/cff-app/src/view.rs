// Render-ready view models. Pages derive these from `(session, league)` and
// their widget states; the TUI only draws them.

use crate::protocol::PageId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: PageId,
    pub nav: NavView,
    pub sections: Vec<Section>,
    /// Page-specific key hints, only the ones that apply right now.
    pub hints: Vec<KeyHint>,
}

impl PageView {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Navigation affordance: who is signed in and whether sign-out is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavView {
    pub label: String,
    pub signed_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

impl Section {
    pub fn message(title: &str, text: impl Into<String>, tone: Tone) -> Self {
        Section {
            title: title.to_string(),
            body: SectionBody::Message(Message {
                text: text.into(),
                tone,
            }),
        }
    }

    pub fn rows(title: &str, rows: Vec<Row>) -> Self {
        Section {
            title: title.to_string(),
            body: SectionBody::Rows(rows),
        }
    }

    pub fn fields(title: &str, fields: Vec<Field>) -> Self {
        Section {
            title: title.to_string(),
            body: SectionBody::Fields(fields),
        }
    }

    /// The message text, when the body is a single message.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            SectionBody::Message(m) => Some(&m.text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Message(Message),
    Rows(Vec<Row>),
    Fields(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Muted,
    Success,
    Error,
}

/// One list row: a headline, an optional muted detail line and an optional
/// right-aligned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub primary: String,
    pub secondary: Option<String>,
    pub trailing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Field {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        KeyHint { key, label }
    }
}
