//! View bindings: the handful of page elements the controllers write to.
//!
//! Every renderer is handed the one view it owns. The in-memory
//! implementations keep the page as markup so front ends can print it and
//! tests can compare it.

use std::{
    fmt::{self, Write as _},
    sync::{Mutex, MutexGuard, PoisonError},
};

use shared::domain::{HobbyId, MeetingId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

impl Link {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }

    pub fn user_profile(username: &str) -> Self {
        Self::new(format!("/user/{username}"), username)
    }
}

/// Inline control attached to a row of a mutable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    RemoveHobby(HobbyId),
    CancelOneOnOne(MeetingId),
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::RemoveHobby(_) => "x",
            Self::CancelOneOnOne(_) => "cancel",
        }
    }

    pub fn target(self) -> String {
        match self {
            Self::RemoveHobby(id) => format!("/remove_hobby/{id}"),
            Self::CancelOneOnOne(id) => format!("/cancel_one_on_one/{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub text: String,
    pub link: Option<Link>,
    pub action: Option<RowAction>,
}

impl Row {
    /// What a reader sees first: the link text when the row is a link.
    pub fn label(&self) -> &str {
        match (&self.link, self.text.is_empty()) {
            (Some(link), true) => &link.text,
            _ => &self.text,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<li>")?;
        let mut pieces = Vec::new();
        if !self.text.is_empty() {
            pieces.push(escape(&self.text));
        }
        if let Some(link) = &self.link {
            pieces.push(anchor(&link.href, &link.text));
        }
        if let Some(action) = self.action {
            pieces.push(anchor(&action.target(), action.label()));
        }
        f.write_str(&pieces.join(" "))?;
        f.write_str("</li>")
    }
}

/// Text followed by an optional link, e.g. "Most common user: <a>bob</a>".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    pub text: String,
    pub link: Option<Link>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(text: impl Into<String>, link: Link) -> Self {
        Self {
            text: text.into(),
            link: Some(link),
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(&self.text))?;
        if let Some(link) = &self.link {
            f.write_str(&anchor(&link.href, &link.text))?;
        }
        Ok(())
    }
}

pub trait ListView: Send + Sync {
    fn clear(&self);
    fn append(&self, row: Row);
    /// Numbering of the first row, for ordered lists.
    fn set_start(&self, _start: i64) {}
}

pub trait TextView: Send + Sync {
    fn replace(&self, content: Content);
}

pub trait ToggleView: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

pub trait InputView: Send + Sync {
    fn value(&self) -> String;
    fn clear(&self);
}

/// Blocking, user-facing notification.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn anchor(href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
}

#[derive(Debug, Default)]
struct ListState {
    start: Option<i64>,
    rows: Vec<Row>,
}

#[derive(Debug, Default)]
pub struct MemoryListView {
    ordered: bool,
    state: Mutex<ListState>,
}

impl MemoryListView {
    pub fn unordered() -> Self {
        Self::default()
    }

    pub fn ordered() -> Self {
        Self {
            ordered: true,
            state: Mutex::default(),
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        locked(&self.state).rows.clone()
    }

    pub fn labels(&self) -> Vec<String> {
        locked(&self.state)
            .rows
            .iter()
            .map(|row| row.label().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        locked(&self.state).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn markup(&self) -> String {
        let state = locked(&self.state);
        let mut out = String::new();
        if self.ordered {
            match state.start {
                Some(start) => {
                    let _ = write!(out, "<ol start=\"{start}\">");
                }
                None => out.push_str("<ol>"),
            }
        } else {
            out.push_str("<ul>");
        }
        for row in &state.rows {
            let _ = write!(out, "{row}");
        }
        out.push_str(if self.ordered { "</ol>" } else { "</ul>" });
        out
    }
}

impl ListView for MemoryListView {
    fn clear(&self) {
        let mut state = locked(&self.state);
        state.rows.clear();
        state.start = None;
    }

    fn append(&self, row: Row) {
        locked(&self.state).rows.push(row);
    }

    fn set_start(&self, start: i64) {
        locked(&self.state).start = Some(start);
    }
}

#[derive(Debug, Default)]
pub struct MemoryTextView {
    content: Mutex<Content>,
}

impl MemoryTextView {
    pub fn content(&self) -> Content {
        locked(&self.content).clone()
    }

    pub fn markup(&self) -> String {
        locked(&self.content).to_string()
    }
}

impl TextView for MemoryTextView {
    fn replace(&self, content: Content) {
        *locked(&self.content) = content;
    }
}

#[derive(Debug)]
pub struct MemoryToggle {
    enabled: Mutex<bool>,
}

impl Default for MemoryToggle {
    fn default() -> Self {
        Self {
            enabled: Mutex::new(true),
        }
    }
}

impl MemoryToggle {
    pub fn is_enabled(&self) -> bool {
        *locked(&self.enabled)
    }
}

impl ToggleView for MemoryToggle {
    fn set_enabled(&self, enabled: bool) {
        *locked(&self.enabled) = enabled;
    }
}

#[derive(Debug, Default)]
pub struct MemoryInput {
    value: Mutex<String>,
}

impl MemoryInput {
    pub fn set_value(&self, value: impl Into<String>) {
        *locked(&self.value) = value.into();
    }
}

impl InputView for MemoryInput {
    fn value(&self) -> String {
        locked(&self.value).clone()
    }

    fn clear(&self) {
        locked(&self.value).clear();
    }
}

/// Keeps every alert raised, newest last.
#[derive(Debug, Default)]
pub struct RecordingAlerter {
    raised: Mutex<Vec<String>>,
}

impl RecordingAlerter {
    pub fn raised(&self) -> Vec<String> {
        locked(&self.raised).clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *locked(&self.raised))
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&self, message: &str) {
        locked(&self.raised).push(message.to_string());
    }
}
