//! Top-level coordination of the composer surfaces.
//!
//! [`Composer`] owns the command menu, the suggestion dropdown, and the
//! pill collection, and is the single entry point for keyboard events and
//! text-change notifications from the host editor. It decides which
//! surface gets first refusal on a key, performs the document mutations
//! when commands resolve (token rewrite on completion, token cleanup after
//! apply), and emits [`ComposerEvent`]s for the host to react to.
//!
//! The composer never owns the document: every entry point borrows the
//! host's [`EditorSurface`] for the duration of the event.

use std::collections::HashSet;
use std::time::Duration;
use std::time::Instant;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use strum::IntoEnumIterator;
use tabchat_protocol::attachment::Attachment;
use tabchat_protocol::items::SuggestionItem;

use crate::command::CommandKind;
use crate::command_menu::CommandMenu;
use crate::command_menu::MenuConfig;
use crate::command_menu::MenuEntry;
use crate::command_menu::MenuSignal;
use crate::editor::EditorSurface;
use crate::events::ComposerEvent;
use crate::events::ComposerEventSender;
use crate::pills::PillCollection;
use crate::providers::DataProvider;
use crate::suggestion_popup::SelectionOutcome;
use crate::suggestion_popup::SuggestionPopup;
use crate::trigger;
use crate::trigger::AtTrigger;
use crate::trigger::CLEANUP_WINDOW;
use crate::trigger::TRIGGER_WINDOW;

/// How long a blur may dangle before the surfaces actually close. Long
/// enough for focus to land on a row the user is about to click, short
/// enough to be imperceptible.
pub const BLUR_GRACE: Duration = Duration::from_millis(80);

#[derive(Debug, Clone, Copy, Default)]
pub struct ComposerConfig {
    pub menu: MenuConfig,
}

pub struct Composer<P> {
    provider: P,
    events: ComposerEventSender,
    menu: CommandMenu,
    popup: SuggestionPopup,
    pills: PillCollection,
    /// A trigger is being composed or a command menu is open; suggestion
    /// keyboard handling is suppressed while set.
    is_command_mode: bool,
    /// Url recorded by a committed suggestion; preferred over raw text on
    /// the next send and invalidated by any genuine text change.
    pending_send_target: Option<String>,
    multiline: bool,
    /// Last plain text suggestions were computed for, to skip redundant
    /// recomputation on no-op notifications.
    last_text: String,
    last_revision: Option<u64>,
    blur_deadline: Option<Instant>,
}

impl<P: DataProvider> Composer<P> {
    pub fn new(provider: P, events: ComposerEventSender, config: ComposerConfig) -> Self {
        Self {
            provider,
            events,
            menu: CommandMenu::new(config.menu),
            popup: SuggestionPopup::new(),
            pills: PillCollection::default(),
            is_command_mode: false,
            pending_send_target: None,
            multiline: false,
            last_text: String::new(),
            last_revision: None,
            blur_deadline: None,
        }
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn suggestions(&self) -> &SuggestionPopup {
        &self.popup
    }

    pub fn pills(&self) -> &PillCollection {
        &self.pills
    }

    pub fn is_command_mode(&self) -> bool {
        self.is_command_mode
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Single keyboard entry point. Returns whether the key was consumed;
    /// a consumed key must not reach the editor's default handling.
    pub fn handle_key_event(&mut self, key_event: KeyEvent, editor: &mut dyn EditorSurface) -> bool {
        // Shift+Tab hands focus to the settings control unless the menu is
        // open and using it for highlight movement.
        if key_event.code == KeyCode::BackTab && !self.menu.is_active() {
            self.events.send(ComposerEvent::FocusSettings);
            return true;
        }

        let (signal, menu_handled) = self.menu.handle_key_event(key_event);
        if let Some(signal) = signal {
            self.on_menu_signal(signal, editor);
        }
        if menu_handled {
            self.events.send(ComposerEvent::Redraw);
            return true;
        }

        if self.is_command_mode {
            if key_event.code == KeyCode::Esc {
                self.leave_command_mode();
                self.events.send(ComposerEvent::Redraw);
                return true;
            }
            // Everything else is ordinary typing while a trigger is being
            // composed, including Backspace over the trigger text.
            return false;
        }

        if self.popup.is_active() {
            let (outcome, popup_handled) = self.popup.handle_key_event(key_event);
            if let Some(outcome) = outcome {
                self.apply_selection(outcome, editor);
            }
            if popup_handled {
                self.events.send(ComposerEvent::Redraw);
                return true;
            }
        }

        match key_event {
            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                if let Some(outcome) = self.popup.commit_highlighted() {
                    self.apply_selection(outcome, editor);
                }
                self.send(editor);
                true
            }
            // Shift+Enter stays with the editor and inserts a line break.
            _ => false,
        }
    }

    /// Notification that the document changed, fired by the host after
    /// every mutation (user edits and composer-initiated rewrites alike).
    pub fn on_text_changed(&mut self, editor: &mut dyn EditorSurface) {
        let window = editor.text_window_before_cursor(TRIGGER_WINDOW);
        if let Some(found) = trigger::find_trigger(&window) {
            self.enter_command_mode(&found, editor);
            self.events.send(ComposerEvent::Redraw);
            return;
        }

        if self.menu.is_active() {
            self.menu.hide();
        }
        self.is_command_mode = false;
        self.popup.unblur();

        let text = editor.text();
        if text != self.last_text {
            self.pending_send_target = None;
        }

        self.multiline = editor.has_block_break();
        if self.multiline {
            self.popup.hide();
            self.last_text = text;
            self.events.send(ComposerEvent::Redraw);
            return;
        }

        let revision = self.provider.revision();
        if text != self.last_text || self.last_revision != Some(revision) {
            if text.is_empty() {
                self.popup.hide();
            } else {
                let corpus = self.suggestion_corpus();
                self.popup.show(&text, &corpus);
            }
            self.last_text = text;
            self.last_revision = Some(revision);
        }
        self.events.send(ComposerEvent::Redraw);
    }

    /// Package the draft and reset. Prefers the pending navigation target
    /// over raw text, then clears pills, document, and dropdown.
    pub fn send(&mut self, editor: &mut dyn EditorSurface) {
        let text = editor.text();
        if text.is_empty() && self.pills.is_empty() {
            return;
        }
        let target = self.pending_send_target.take().unwrap_or(text);
        let pill_count = self.pills.len();
        self.events.send(ComposerEvent::Send { target, pill_count });

        if pill_count > 0 {
            self.pills.clear();
            self.events.send(ComposerEvent::PillsChanged(Vec::new()));
        }
        editor.clear();
        self.last_text = String::new();
        self.popup.hide();
        self.multiline = false;
        editor.focus();
        self.events.send(ComposerEvent::Redraw);
    }

    /// The editor lost focus. Nothing closes yet: the deadline leaves room
    /// for a click that is about to land on one of our rows.
    pub fn on_editor_blur(&mut self, now: Instant) {
        self.blur_deadline = Some(now + BLUR_GRACE);
    }

    /// Focus returned before the deadline; keep everything open.
    pub fn on_editor_focus(&mut self) {
        self.blur_deadline = None;
    }

    /// Host tick. Closes both surfaces once an unreclaimed blur deadline
    /// expires; returns whether anything closed.
    pub fn resolve_blur_if_due(&mut self, now: Instant) -> bool {
        let due = self
            .blur_deadline
            .is_some_and(|deadline| now >= deadline);
        if !due {
            return false;
        }
        self.blur_deadline = None;
        let mut closed = false;
        if self.popup.is_active() {
            self.popup.hide();
            closed = true;
        }
        if self.menu.is_active() || self.is_command_mode {
            self.menu.hide();
            self.is_command_mode = false;
            closed = true;
        }
        if closed {
            self.events.send(ComposerEvent::Redraw);
        }
        closed
    }

    /// Mouse selection in the suggestion dropdown.
    pub fn suggestion_click(&mut self, index: usize, editor: &mut dyn EditorSurface) {
        self.on_editor_focus();
        if let Some(outcome) = self.popup.commit_at(index) {
            self.apply_selection(outcome, editor);
            self.events.send(ComposerEvent::Redraw);
        }
    }

    /// Mouse selection of a command row in the menu.
    pub fn menu_command_click(&mut self, index: usize, editor: &mut dyn EditorSurface) {
        self.on_editor_focus();
        if let Some(signal) = self.menu.click_command(index) {
            self.on_menu_signal(signal, editor);
            self.events.send(ComposerEvent::Redraw);
        }
    }

    /// Mouse toggle of a checkbox row in the menu.
    pub fn menu_entry_click(&mut self, index: usize) {
        self.on_editor_focus();
        self.menu.click_entry(index);
        self.events.send(ComposerEvent::Redraw);
    }

    /// A click landed outside the widget. The menu closes immediately; the
    /// dropdown follows the blur path and its grace period.
    pub fn click_outside(&mut self) {
        if self.menu.is_active() || self.is_command_mode {
            self.leave_command_mode();
            self.events.send(ComposerEvent::Redraw);
        }
    }

    /// Host path for the remove button on a pill.
    pub fn remove_pill(&mut self, identity: &str) {
        if self.pills.remove(identity) {
            self.events
                .send(ComposerEvent::PillsChanged(self.pills.list()));
            self.events.send(ComposerEvent::Redraw);
        }
    }

    fn enter_command_mode(&mut self, found: &AtTrigger, editor: &mut dyn EditorSurface) {
        self.is_command_mode = true;

        match found.token.parse::<CommandKind>() {
            Ok(command) if self.command_available(command) => {
                // An exactly-typed command name completes immediately,
                // bypassing the command list.
                self.complete_command(command, editor);
            }
            _ => {
                if found.token.is_empty() {
                    self.menu.show_commands("", self.available_commands());
                } else if !self.menu.in_item_list() {
                    // Don't clobber an open checklist while extra
                    // characters are being typed after the command name.
                    self.menu
                        .show_commands(&found.token, self.available_commands());
                }
            }
        }
        // The dropdown recedes but survives; closing the menu can resume
        // it without recomputation.
        self.popup.blur();
    }

    fn on_menu_signal(&mut self, signal: MenuSignal, editor: &mut dyn EditorSurface) {
        match signal {
            MenuSignal::Completed(command) => self.complete_command(command, editor),
            MenuSignal::Applied {
                command,
                items,
                to_remove,
            } => self.apply_menu_selection(command, items, to_remove, editor),
            MenuSignal::Dismissed => self.leave_command_mode(),
        }
    }

    /// Rewrite the in-progress trigger token to the canonical command name,
    /// then populate the item list. The rewrite runs first so the document
    /// already matches the menu when the list appears.
    fn complete_command(&mut self, command: CommandKind, editor: &mut dyn EditorSurface) {
        let window = editor.text_window_before_cursor(TRIGGER_WINDOW);
        if let Some(found) = trigger::find_trigger(&window) {
            if found.token != command.command() {
                let cursor = editor.cursor();
                let start = cursor.saturating_sub(found.span_len());
                editor.replace_range(start..cursor, &format!("@{}", command.command()));
            }
        }
        self.show_item_list(command);
    }

    fn show_item_list(&mut self, command: CommandKind) {
        let entries = self.entries_for(command);
        let existing = if command == CommandKind::Tabs {
            self.pills.tab_identities()
        } else {
            HashSet::new()
        };
        let available = self.available_commands();
        self.menu.show_items(command, entries, existing, available);
    }

    /// Reconcile an applied item list into the pill collection, then
    /// consume the trigger text. Duplicate adds are left to the pill
    /// collection's own dedup; nothing is pre-filtered here.
    fn apply_menu_selection(
        &mut self,
        command: CommandKind,
        items: Vec<Attachment>,
        to_remove: Vec<String>,
        editor: &mut dyn EditorSurface,
    ) {
        tracing::debug!(
            "applying {}: {} selected, {} removed",
            command.command(),
            items.len(),
            to_remove.len()
        );
        let mut changed = false;
        for identity in &to_remove {
            changed |= self.pills.remove(identity);
        }
        for item in items {
            changed |= self.pills.add(item);
        }

        self.clear_trigger_token(editor);
        self.is_command_mode = false;
        self.popup.unblur();

        if changed {
            self.events
                .send(ComposerEvent::PillsChanged(self.pills.list()));
        }
    }

    /// Delete the full `@token` span left in the document after an apply.
    fn clear_trigger_token(&mut self, editor: &mut dyn EditorSurface) {
        let window = editor.text_window_before_cursor(CLEANUP_WINDOW);
        if let Some(found) = trigger::find_trigger(&window) {
            let cursor = editor.cursor();
            let start = cursor.saturating_sub(found.span_len());
            editor.replace_range(start..cursor, "");
        }
    }

    fn apply_selection(&mut self, outcome: SelectionOutcome, editor: &mut dyn EditorSurface) {
        match outcome {
            SelectionOutcome::KeepTyped => {}
            SelectionOutcome::ReplaceDocument {
                replacement,
                target,
            } => {
                editor.replace_all(&replacement);
                // The rewrite is ours; the follow-up text-change must not
                // count as a user edit and drop the target.
                self.last_text = replacement;
                self.pending_send_target = target;
            }
        }
    }

    fn leave_command_mode(&mut self) {
        self.menu.hide();
        self.is_command_mode = false;
        self.popup.unblur();
    }

    fn command_available(&self, command: CommandKind) -> bool {
        match command {
            CommandKind::Tabs => self.provider.tabs().is_some(),
            CommandKind::History => self.provider.history().is_some(),
            CommandKind::Bookmarks => self.provider.bookmarks().is_some(),
        }
    }

    fn available_commands(&self) -> Vec<CommandKind> {
        CommandKind::iter()
            .filter(|command| self.command_available(*command))
            .collect()
    }

    fn entries_for(&self, command: CommandKind) -> Vec<MenuEntry> {
        match command {
            CommandKind::Tabs => self
                .provider
                .tabs()
                .unwrap_or_default()
                .into_iter()
                .map(Attachment::Tab)
                .filter_map(MenuEntry::new)
                .collect(),
            CommandKind::History => self
                .provider
                .history()
                .unwrap_or_default()
                .into_iter()
                .map(Attachment::Suggestion)
                .filter_map(MenuEntry::new)
                .collect(),
            CommandKind::Bookmarks => self
                .provider
                .bookmarks()
                .unwrap_or_default()
                .into_iter()
                .map(Attachment::Suggestion)
                .filter_map(MenuEntry::new)
                .collect(),
        }
    }

    /// History first, then bookmarks, preserving provider order within
    /// each; the providers pre-sort their own entries.
    fn suggestion_corpus(&self) -> Vec<SuggestionItem> {
        let mut corpus = self.provider.history().unwrap_or_default();
        corpus.extend(self.provider.bookmarks().unwrap_or_default());
        corpus
    }
}
