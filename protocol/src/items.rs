use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumString;
use strum_macros::IntoStaticStr;

/// A browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TabItem {
    /// Host-assigned identifier, stable for the lifetime of the tab.
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
}

/// Where a suggestion row came from and how selecting it behaves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Display, EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionKind {
    History,
    Bookmark,
    Search,
    Navigate,
    Command,
    Tab,
}

/// One row of the suggestion dropdown, or a history/bookmark entry as
/// reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuggestionItem {
    pub title: String,
    /// Absent for synthesized search rows. Items without a url can never
    /// become pills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub kind: SuggestionKind,
    /// Glyph hint for rows that have no favicon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visits: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit_time: Option<DateTime<Utc>>,
}

impl SuggestionItem {
    pub fn new(kind: SuggestionKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            kind,
            icon: None,
            favicon_url: None,
            visits: None,
            last_visit_time: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_favicon_url(mut self, favicon_url: impl Into<String>) -> Self {
        self.favicon_url = Some(favicon_url.into());
        self
    }

    pub fn with_visits(mut self, visits: u64) -> Self {
        self.visits = Some(visits);
        self
    }

    pub fn with_last_visit_time(mut self, at: DateTime<Utc>) -> Self {
        self.last_visit_time = Some(at);
        self
    }
}
