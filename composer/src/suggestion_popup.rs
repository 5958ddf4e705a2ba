//! Ranked suggestion dropdown over the free text.
//!
//! The popup owns visibility, the blurred flag, and the highlight; the row
//! list itself comes from `tabchat_suggest` on every show. Committing a row
//! is reported as a [`SelectionOutcome`] so the orchestrator can rewrite
//! the document and remember the navigation target.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use tabchat_protocol::items::SuggestionItem;
use tabchat_protocol::items::SuggestionKind;

use crate::highlight::BaselineCursor;

/// What committing a suggestion row means for the document.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// A search row: the typed text stays as the message, the dropdown
    /// just closes.
    KeepTyped,
    /// Replace the whole document with `replacement`; when `target` is set
    /// it takes priority over raw text on the next send.
    ReplaceDocument {
        replacement: String,
        target: Option<String>,
    },
}

#[derive(Debug, Default)]
pub struct SuggestionPopup {
    active: bool,
    /// Visible but dimmed while the command menu has input priority.
    blurred: bool,
    highlight: BaselineCursor,
    suggestions: Vec<SuggestionItem>,
    /// Query the current list was computed for.
    query: String,
    /// Query dismissed with Escape; an identical re-show stays hidden
    /// until the text genuinely changes.
    dismissed_query: Option<String>,
}

impl SuggestionPopup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_blurred(&self) -> bool {
        self.blurred
    }

    /// `None` is the baseline: dropdown open, nothing highlighted.
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlight.index()
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    /// Recompute the list for `query` and show it. An empty result hides
    /// the dropdown, as does re-showing a query the user just dismissed.
    pub fn show(&mut self, query: &str, corpus: &[SuggestionItem]) {
        if self.dismissed_query.as_deref() == Some(query) {
            // hide() leaves the suppression in place.
            self.hide();
            return;
        }
        self.dismissed_query = None;

        let suggestions = tabchat_suggest::filter(query, corpus);
        if suggestions.is_empty() {
            self.hide();
            return;
        }
        self.active = true;
        self.suggestions = suggestions;
        self.query = query.to_string();
        self.highlight.reset();
    }

    pub fn hide(&mut self) {
        self.active = false;
        self.blurred = false;
        self.suggestions.clear();
        self.query.clear();
        self.highlight.reset();
    }

    /// Dim without closing; the list survives until the next genuine
    /// text change recomputes it.
    pub fn blur(&mut self) {
        if self.active {
            self.blurred = true;
        }
    }

    pub fn unblur(&mut self) {
        self.blurred = false;
    }

    /// Returns the outcome of a committed row (if any) and whether the key
    /// was consumed. Blurred popups ignore keys entirely.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> (Option<SelectionOutcome>, bool) {
        if !self.active || self.blurred {
            return (None, false);
        }
        match key_event {
            KeyEvent {
                code: KeyCode::Down,
                ..
            } => {
                self.highlight.down(self.suggestions.len());
                (None, true)
            }
            KeyEvent {
                code: KeyCode::Up, ..
            } => {
                self.highlight.up();
                (None, true)
            }
            KeyEvent {
                code: KeyCode::Esc, ..
            } => {
                self.dismiss();
                (None, true)
            }
            KeyEvent {
                code: KeyCode::Tab, ..
            } => match self.commit_highlighted() {
                Some(outcome) => (Some(outcome), true),
                // Tab with nothing highlighted closes the dropdown rather
                // than moving focus out of the editor.
                None => {
                    self.hide();
                    (None, true)
                }
            },
            _ => (None, false),
        }
    }

    /// Commit the highlighted row, if any, closing the dropdown.
    pub fn commit_highlighted(&mut self) -> Option<SelectionOutcome> {
        let index = self.highlight.index()?;
        self.commit_at(index)
    }

    /// Mouse path: commit the clicked row.
    pub fn commit_at(&mut self, index: usize) -> Option<SelectionOutcome> {
        if !self.active {
            return None;
        }
        let item = self.suggestions.get(index)?.clone();
        self.hide();
        if item.kind == SuggestionKind::Search {
            return Some(SelectionOutcome::KeepTyped);
        }
        let replacement = match &item.url {
            Some(url) => url.clone(),
            None => item.title.clone(),
        };
        Some(SelectionOutcome::ReplaceDocument {
            replacement,
            target: item.url,
        })
    }

    /// Escape: hide and remember the query so it does not pop right back.
    fn dismiss(&mut self) {
        self.dismissed_query = Some(self.query.clone());
        self.hide();
    }
}
