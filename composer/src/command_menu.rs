//! Multi-level `@` command menu.
//!
//! Two levels: a filtered list of command names, then a checkbox list of
//! the chosen command's items. The menu owns highlight and selection state
//! plus the apply-time diff against the snapshot of already-attached ids.
//! Document edits are not performed here; completion and apply surface as
//! [`MenuSignal`]s the orchestrator turns into trigger rewrites and pill
//! mutations.

use std::collections::HashSet;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use tabchat_protocol::attachment::Attachment;

use crate::command::CommandKind;
use crate::highlight::WrapCursor;

/// One checkbox row in an item list.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    attachment: Attachment,
    identity: String,
}

impl MenuEntry {
    /// Wrap an attachment for listing. Rows without an identity are never
    /// offered since they could not become pills.
    pub fn new(attachment: Attachment) -> Option<Self> {
        let identity = attachment.identity()?;
        Some(Self {
            attachment,
            identity,
        })
    }

    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn title(&self) -> &str {
        self.attachment.title()
    }
}

/// Outcome of a key or click the menu consumed.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuSignal {
    /// A command was chosen. The orchestrator rewrites the in-progress
    /// trigger token to the canonical name, then populates the item list.
    Completed(CommandKind),
    /// An item list was committed. `to_remove` holds identities that were
    /// pre-attached but are no longer selected, sorted for determinism.
    Applied {
        command: CommandKind,
        items: Vec<Attachment>,
        to_remove: Vec<String>,
    },
    /// The menu closed itself.
    Dismissed,
}

/// Host-tunable menu behavior.
#[derive(Debug, Clone, Copy)]
pub struct MenuConfig {
    /// When false, Backspace pops only the tabs item list back to the
    /// command list and lets the editor delete text in the other lists.
    /// Host widgets disagree on this, so it is a knob rather than a rule.
    pub backspace_pops_all_item_lists: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            backspace_pops_all_item_lists: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuLevel {
    Commands,
    Items(CommandKind),
}

#[derive(Debug)]
pub struct CommandMenu {
    active: bool,
    level: MenuLevel,
    /// Free-text filter, applied only at the command-list level.
    query: String,
    /// Capability-gated command set, refreshed on every show.
    available: Vec<CommandKind>,
    entries: Vec<MenuEntry>,
    selected: HashSet<String>,
    /// Snapshot of pre-attached ids taken when the item list was shown.
    initial: HashSet<String>,
    highlight: WrapCursor,
    config: MenuConfig,
}

impl CommandMenu {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            active: false,
            level: MenuLevel::Commands,
            query: String::new(),
            available: Vec::new(),
            entries: Vec::new(),
            selected: HashSet::new(),
            initial: HashSet::new(),
            highlight: WrapCursor::default(),
            config,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The command whose item list is showing, `None` at the command list.
    pub fn current_command(&self) -> Option<CommandKind> {
        match self.level {
            MenuLevel::Items(command) if self.active => Some(command),
            _ => None,
        }
    }

    pub fn in_item_list(&self) -> bool {
        self.current_command().is_some()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlight.index()
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_checked(&self, identity: &str) -> bool {
        self.selected.contains(identity)
    }

    /// Commands whose name starts with the current query.
    pub fn filtered_commands(&self) -> Vec<CommandKind> {
        let needle = self.query.to_lowercase();
        self.available
            .iter()
            .copied()
            .filter(|command| command.command().starts_with(&needle))
            .collect()
    }

    /// The command list is showing but the query filtered everything out;
    /// the display renders an explicit empty state instead of no rows.
    pub fn has_no_matching_commands(&self) -> bool {
        self.active && self.level == MenuLevel::Commands && self.filtered_commands().is_empty()
    }

    /// Enter the command-list level. Called on every trigger-token change,
    /// so the highlight restarts at the top each time the set changes.
    pub fn show_commands(&mut self, query: &str, available: Vec<CommandKind>) {
        self.active = true;
        self.level = MenuLevel::Commands;
        self.query = query.to_string();
        self.available = available;
        self.entries.clear();
        self.selected.clear();
        self.initial.clear();
        self.highlight.reset();
    }

    /// Enter the item-list level for `command`. `existing_pill_ids` is the
    /// diff baseline (the orchestrator passes the attached tab ids for the
    /// tabs command and nothing otherwise); those rows start checked.
    pub fn show_items(
        &mut self,
        command: CommandKind,
        entries: Vec<MenuEntry>,
        existing_pill_ids: HashSet<String>,
        available: Vec<CommandKind>,
    ) {
        self.active = true;
        self.level = MenuLevel::Items(command);
        self.query.clear();
        self.available = available;
        self.entries = entries;
        self.selected = existing_pill_ids.clone();
        self.initial = existing_pill_ids;
        self.highlight.reset();
    }

    pub fn hide(&mut self) {
        self.active = false;
        self.level = MenuLevel::Commands;
        self.query.clear();
        self.entries.clear();
        self.selected.clear();
        self.initial.clear();
        self.highlight.reset();
    }

    /// Returns the signal produced (if any) and whether the key was
    /// consumed. An unconsumed key falls back to the host editor.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> (Option<MenuSignal>, bool) {
        if !self.active {
            return (None, false);
        }
        match key_event {
            KeyEvent {
                code: KeyCode::Tab, ..
            } => {
                self.highlight.wrap_next(self.list_len());
                (None, true)
            }
            KeyEvent {
                code: KeyCode::BackTab,
                ..
            } => {
                self.highlight.wrap_prev(self.list_len());
                (None, true)
            }
            KeyEvent {
                code: KeyCode::Down,
                ..
            } => {
                self.highlight.clamp_next(self.list_len());
                (None, true)
            }
            KeyEvent {
                code: KeyCode::Up, ..
            } => {
                self.highlight.clamp_prev();
                (None, true)
            }
            KeyEvent {
                code: KeyCode::Char(' '),
                modifiers: KeyModifiers::NONE,
                ..
            } if self.in_item_list() => {
                self.toggle_at(self.highlight.index());
                (None, true)
            }
            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => match self.level {
                MenuLevel::Items(command)
                    if command == CommandKind::Tabs
                        || self.config.backspace_pops_all_item_lists =>
                {
                    self.pop_to_commands();
                    (None, true)
                }
                // At the command list the editor erases the trigger text.
                _ => (None, false),
            },
            KeyEvent {
                code: KeyCode::Esc, ..
            } => {
                self.hide();
                (Some(MenuSignal::Dismissed), true)
            }
            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                ..
            } => match self.level {
                MenuLevel::Commands => {
                    match self.filtered_commands().get(self.highlight.index()).copied() {
                        Some(command) => (Some(MenuSignal::Completed(command)), true),
                        None => (None, false),
                    }
                }
                MenuLevel::Items(command) => (self.apply(command), true),
            },
            _ => (None, false),
        }
    }

    /// Mouse path for choosing a command row.
    pub fn click_command(&mut self, index: usize) -> Option<MenuSignal> {
        if !self.active || self.level != MenuLevel::Commands {
            return None;
        }
        let command = self.filtered_commands().get(index).copied()?;
        Some(MenuSignal::Completed(command))
    }

    /// Mouse path for toggling a checkbox row.
    pub fn click_entry(&mut self, index: usize) {
        if self.in_item_list() {
            self.toggle_at(index);
        }
    }

    fn list_len(&self) -> usize {
        match self.level {
            MenuLevel::Commands => self.filtered_commands().len(),
            MenuLevel::Items(_) => self.entries.len(),
        }
    }

    fn toggle_at(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        let identity = entry.identity().to_string();
        if !self.selected.remove(&identity) {
            self.selected.insert(identity);
        }
    }

    fn pop_to_commands(&mut self) {
        self.level = MenuLevel::Commands;
        self.query.clear();
        self.entries.clear();
        self.selected.clear();
        self.initial.clear();
        self.highlight.reset();
    }

    /// The commit diff. Pre-attached ids that were unchecked this session
    /// become removals; removals only exist for the tabs command, which is
    /// the one fed a diff baseline.
    fn apply(&mut self, command: CommandKind) -> Option<MenuSignal> {
        let items: Vec<Attachment> = self
            .entries
            .iter()
            .filter(|entry| self.selected.contains(entry.identity()))
            .map(|entry| entry.attachment().clone())
            .collect();
        let mut to_remove: Vec<String> = if command == CommandKind::Tabs {
            self.initial
                .iter()
                .filter(|id| !self.selected.contains(*id))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        to_remove.sort();

        if items.is_empty() && to_remove.is_empty() {
            // Opened and committed with no changes: keep the menu up.
            return None;
        }
        self.hide();
        Some(MenuSignal::Applied {
            command,
            items,
            to_remove,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;
    use tabchat_protocol::items::SuggestionItem;
    use tabchat_protocol::items::SuggestionKind;
    use tabchat_protocol::items::TabItem;

    fn all_commands() -> Vec<CommandKind> {
        vec![
            CommandKind::Tabs,
            CommandKind::History,
            CommandKind::Bookmarks,
        ]
    }

    fn tab_entry(id: &str) -> MenuEntry {
        MenuEntry::new(Attachment::Tab(TabItem {
            id: id.to_string(),
            title: format!("Tab {id}"),
            url: format!("https://example.com/{id}"),
            favicon_url: None,
        }))
        .unwrap()
    }

    fn menu() -> CommandMenu {
        CommandMenu::new(MenuConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn identityless_attachments_cannot_become_entries() {
        let searchy = Attachment::Suggestion(SuggestionItem::new(
            SuggestionKind::Search,
            "Search for \"x\"",
        ));
        assert_eq!(MenuEntry::new(searchy), None);
    }

    #[test]
    fn command_filter_is_starts_with() {
        let mut menu = menu();
        menu.show_commands("ta", all_commands());
        assert_eq!(menu.filtered_commands(), vec![CommandKind::Tabs]);
        menu.show_commands("b", all_commands());
        assert_eq!(menu.filtered_commands(), vec![CommandKind::Bookmarks]);
        menu.show_commands("", all_commands());
        assert_eq!(menu.filtered_commands(), all_commands());
    }

    #[test]
    fn unmatched_query_renders_the_empty_state() {
        let mut menu = menu();
        menu.show_commands("zzz", all_commands());
        assert!(menu.has_no_matching_commands());
        let (signal, handled) = menu.handle_key_event(key(KeyCode::Enter));
        assert_eq!(signal, None);
        assert!(!handled);
    }

    #[test]
    fn absent_capabilities_are_not_offered() {
        let mut menu = menu();
        menu.show_commands("", vec![CommandKind::Tabs, CommandKind::History]);
        assert_eq!(
            menu.filtered_commands(),
            vec![CommandKind::Tabs, CommandKind::History]
        );
    }

    #[test]
    fn tab_wraps_around_and_arrows_clamp() {
        let mut menu = menu();
        menu.show_commands("", all_commands());
        for _ in 0..3 {
            menu.handle_key_event(key(KeyCode::Tab));
        }
        assert_eq!(menu.highlighted_index(), 0);

        menu.handle_key_event(key(KeyCode::BackTab));
        assert_eq!(menu.highlighted_index(), 2);

        menu.show_commands("", all_commands());
        for _ in 0..5 {
            menu.handle_key_event(key(KeyCode::Down));
        }
        assert_eq!(menu.highlighted_index(), 2);
        for _ in 0..5 {
            menu.handle_key_event(key(KeyCode::Up));
        }
        assert_eq!(menu.highlighted_index(), 0);
    }

    #[test]
    fn enter_completes_the_highlighted_command() {
        let mut menu = menu();
        menu.show_commands("", all_commands());
        menu.handle_key_event(key(KeyCode::Down));
        let (signal, handled) = menu.handle_key_event(key(KeyCode::Enter));
        assert!(handled);
        assert_eq!(signal, Some(MenuSignal::Completed(CommandKind::History)));
    }

    #[test]
    fn highlight_restarts_at_the_top_on_every_show() {
        let mut menu = menu();
        menu.show_commands("", all_commands());
        menu.handle_key_event(key(KeyCode::Down));
        assert_eq!(menu.highlighted_index(), 1);
        menu.show_commands("t", all_commands());
        assert_eq!(menu.highlighted_index(), 0);
    }

    #[test]
    fn space_toggles_the_highlighted_checkbox() {
        let mut menu = menu();
        menu.show_items(
            CommandKind::Tabs,
            vec![tab_entry("a"), tab_entry("b")],
            HashSet::new(),
            all_commands(),
        );
        menu.handle_key_event(key(KeyCode::Char(' ')));
        assert!(menu.is_checked("a"));
        menu.handle_key_event(key(KeyCode::Char(' ')));
        assert!(!menu.is_checked("a"));
    }

    #[test]
    fn space_is_plain_text_at_the_command_list() {
        let mut menu = menu();
        menu.show_commands("", all_commands());
        let (signal, handled) = menu.handle_key_event(key(KeyCode::Char(' ')));
        assert_eq!(signal, None);
        assert!(!handled);
    }

    #[test]
    fn toggling_past_the_end_of_the_list_is_a_no_op() {
        let mut menu = menu();
        menu.show_items(
            CommandKind::Tabs,
            vec![tab_entry("a")],
            HashSet::new(),
            all_commands(),
        );
        menu.click_entry(5);
        assert!(!menu.is_checked("a"));
        assert!(menu.is_active());
    }

    #[test]
    fn apply_reports_the_selection_diff() {
        let mut menu = menu();
        let entries = vec![
            tab_entry("a"),
            tab_entry("b"),
            tab_entry("c"),
            tab_entry("d"),
        ];
        let existing =
            HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()]);
        menu.show_items(CommandKind::Tabs, entries, existing, all_commands());

        // Uncheck b, check d.
        menu.click_entry(1);
        menu.click_entry(3);

        let (signal, handled) = menu.handle_key_event(key(KeyCode::Enter));
        assert!(handled);
        let Some(MenuSignal::Applied {
            command,
            items,
            to_remove,
        }) = signal
        else {
            panic!("expected an apply signal");
        };
        assert_eq!(command, CommandKind::Tabs);
        let titles: Vec<&str> = items.iter().map(Attachment::title).collect();
        assert_eq!(titles, vec!["Tab a", "Tab c", "Tab d"]);
        assert_eq!(to_remove, vec!["b".to_string()]);
        assert!(!menu.is_active());
    }

    #[test]
    fn apply_without_changes_keeps_the_menu_open() {
        let mut menu = menu();
        menu.show_items(
            CommandKind::Tabs,
            vec![tab_entry("a")],
            HashSet::new(),
            all_commands(),
        );
        let (signal, handled) = menu.handle_key_event(key(KeyCode::Enter));
        assert_eq!(signal, None);
        assert!(handled);
        assert!(menu.is_active());
    }

    #[test]
    fn history_apply_never_reports_removals() {
        let mut menu = menu();
        let entry = MenuEntry::new(Attachment::Suggestion(
            SuggestionItem::new(SuggestionKind::History, "Rust blog")
                .with_url("https://blog.rust-lang.org"),
        ))
        .unwrap();
        // A stray baseline must not turn into removals for history.
        let stray: HashSet<String> = ["history-https://old.example".to_string()].into();
        menu.show_items(CommandKind::History, vec![entry], stray, all_commands());
        menu.click_entry(0);
        let (signal, _) = menu.handle_key_event(key(KeyCode::Enter));
        let Some(MenuSignal::Applied { to_remove, .. }) = signal else {
            panic!("expected an apply signal");
        };
        assert_eq!(to_remove, Vec::<String>::new());
    }

    #[test]
    fn backspace_pops_the_tabs_list_back_to_commands() {
        let mut menu = menu();
        menu.show_items(
            CommandKind::Tabs,
            vec![tab_entry("a")],
            HashSet::new(),
            all_commands(),
        );
        let (_, handled) = menu.handle_key_event(key(KeyCode::Backspace));
        assert!(handled);
        assert!(menu.is_active());
        assert_eq!(menu.current_command(), None);
        assert_eq!(menu.filtered_commands(), all_commands());
    }

    #[test]
    fn backspace_at_the_command_list_is_left_to_the_editor() {
        let mut menu = menu();
        menu.show_commands("ta", all_commands());
        let (_, handled) = menu.handle_key_event(key(KeyCode::Backspace));
        assert!(!handled);
    }

    #[test]
    fn backspace_pop_is_configurable_for_history_lists() {
        let mut strict = CommandMenu::new(MenuConfig {
            backspace_pops_all_item_lists: false,
        });
        let entry = MenuEntry::new(Attachment::Suggestion(
            SuggestionItem::new(SuggestionKind::History, "Rust blog")
                .with_url("https://blog.rust-lang.org"),
        ))
        .unwrap();
        strict.show_items(
            CommandKind::History,
            vec![entry.clone()],
            HashSet::new(),
            all_commands(),
        );
        let (_, handled) = strict.handle_key_event(key(KeyCode::Backspace));
        assert!(!handled);

        let mut lenient = menu();
        lenient.show_items(
            CommandKind::History,
            vec![entry],
            HashSet::new(),
            all_commands(),
        );
        let (_, handled) = lenient.handle_key_event(key(KeyCode::Backspace));
        assert!(handled);
        assert_eq!(lenient.current_command(), None);
    }

    #[test]
    fn escape_dismisses_from_any_level() {
        let mut menu = menu();
        menu.show_commands("", all_commands());
        let (signal, _) = menu.handle_key_event(key(KeyCode::Esc));
        assert_eq!(signal, Some(MenuSignal::Dismissed));
        assert!(!menu.is_active());

        menu.show_items(
            CommandKind::Tabs,
            vec![tab_entry("a")],
            HashSet::new(),
            all_commands(),
        );
        let (signal, _) = menu.handle_key_event(key(KeyCode::Esc));
        assert_eq!(signal, Some(MenuSignal::Dismissed));
        assert!(!menu.is_active());
    }

    #[test]
    fn keys_are_ignored_while_inactive() {
        let mut menu = menu();
        let (signal, handled) = menu.handle_key_event(key(KeyCode::Down));
        assert_eq!(signal, None);
        assert!(!handled);
    }

    #[test]
    fn click_selects_a_command_row() {
        let mut menu = menu();
        menu.show_commands("", all_commands());
        assert_eq!(
            menu.click_command(2),
            Some(MenuSignal::Completed(CommandKind::Bookmarks))
        );
        assert_eq!(menu.click_command(9), None);
    }
}
