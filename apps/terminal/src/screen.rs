//! The home page as printed to the terminal.

use std::{fmt::Write as _, sync::Arc};

use client_core::{
    views::{Alerter, MemoryInput, MemoryListView, MemoryTextView, MemoryToggle},
    HomeBindings, PaginationBindings,
};

/// Alerts go to stderr so they stand out from the page snapshot.
pub struct ConsoleAlerter;

impl Alerter for ConsoleAlerter {
    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}

pub struct TerminalScreen {
    pub hobby_list: Arc<MemoryListView>,
    pub hobby_input: Arc<MemoryInput>,
    pub popular: Arc<MemoryListView>,
    pub page_number: Arc<MemoryTextView>,
    pub previous: Arc<MemoryToggle>,
    pub next: Arc<MemoryToggle>,
    pub one_on_ones: Arc<MemoryListView>,
    pub most_common_user: Arc<MemoryTextView>,
    pub never_met: Arc<MemoryTextView>,
}

impl Default for TerminalScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self {
            hobby_list: Arc::new(MemoryListView::unordered()),
            hobby_input: Arc::new(MemoryInput::default()),
            popular: Arc::new(MemoryListView::ordered()),
            page_number: Arc::new(MemoryTextView::default()),
            previous: Arc::new(MemoryToggle::default()),
            next: Arc::new(MemoryToggle::default()),
            one_on_ones: Arc::new(MemoryListView::unordered()),
            most_common_user: Arc::new(MemoryTextView::default()),
            never_met: Arc::new(MemoryTextView::default()),
        }
    }

    pub fn bindings(&self) -> HomeBindings {
        HomeBindings {
            hobby_list: self.hobby_list.clone(),
            hobby_input: self.hobby_input.clone(),
            popular: PaginationBindings {
                list: self.popular.clone(),
                page_number: self.page_number.clone(),
                previous: self.previous.clone(),
                next: self.next.clone(),
            },
            one_on_ones: self.one_on_ones.clone(),
            most_common_user: self.most_common_user.clone(),
            never_met: self.never_met.clone(),
            alerter: Arc::new(ConsoleAlerter),
        }
    }

    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.most_common_user.markup());
        let _ = writeln!(out, "{}", self.never_met.markup());
        let _ = writeln!(out, "your hobbies: {}", self.hobby_list.markup());
        let _ = writeln!(out, "one-on-ones: {}", self.one_on_ones.markup());
        let _ = writeln!(
            out,
            "popular hobbies, page {} [prev {}] [next {}]: {}",
            self.page_number.markup(),
            toggle_state(&self.previous),
            toggle_state(&self.next),
            self.popular.markup()
        );
        out
    }
}

fn toggle_state(toggle: &MemoryToggle) -> &'static str {
    if toggle.is_enabled() {
        "on"
    } else {
        "off"
    }
}
