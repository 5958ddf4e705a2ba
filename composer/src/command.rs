use strum_macros::AsRefStr;
use strum_macros::EnumIter;
use strum_macros::EnumString;
use strum_macros::IntoStaticStr;

/// Commands reachable by typing `@` in the composer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    // DO NOT ALPHA-SORT! Enum order is presentation order in the menu.
    Tabs,
    History,
    Bookmarks,
}

impl CommandKind {
    /// Canonical name as typed after the `@`.
    pub fn command(self) -> &'static str {
        self.into()
    }

    /// User-visible description shown next to the command name.
    pub fn description(self) -> &'static str {
        match self {
            CommandKind::Tabs => "attach open tabs to your message",
            CommandKind::History => "attach pages from your browsing history",
            CommandKind::Bookmarks => "attach saved bookmarks",
        }
    }
}
