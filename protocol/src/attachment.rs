use serde::Deserialize;
use serde::Serialize;

use crate::items::SuggestionItem;
use crate::items::TabItem;

/// Anything that can ride along with a message as a removable pill.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Tab(TabItem),
    Suggestion(SuggestionItem),
}

impl Attachment {
    /// Stable identity used for pill dedup. Tabs use the host-assigned id;
    /// suggestions use `{kind}-{url}`. A suggestion without a url has no
    /// identity and cannot be attached.
    pub fn identity(&self) -> Option<String> {
        match self {
            Attachment::Tab(tab) => Some(tab.id.clone()),
            Attachment::Suggestion(item) => {
                let kind = item.kind;
                item.url.as_ref().map(|url| format!("{kind}-{url}"))
            }
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Attachment::Tab(tab) => &tab.title,
            Attachment::Suggestion(item) => &item.title,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Attachment::Tab(tab) => Some(tab.url.as_str()),
            Attachment::Suggestion(item) => item.url.as_deref(),
        }
    }

    pub fn favicon_url(&self) -> Option<&str> {
        match self {
            Attachment::Tab(tab) => tab.favicon_url.as_deref(),
            Attachment::Suggestion(item) => item.favicon_url.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::items::SuggestionKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn tab_identity_is_the_host_id() {
        let attachment = Attachment::Tab(TabItem {
            id: "42".to_string(),
            title: "Crates.io".to_string(),
            url: "https://crates.io".to_string(),
            favicon_url: None,
        });
        assert_eq!(attachment.identity(), Some("42".to_string()));
    }

    #[test]
    fn suggestion_identity_combines_kind_and_url() {
        let attachment = Attachment::Suggestion(
            SuggestionItem::new(SuggestionKind::Bookmark, "Docs").with_url("https://docs.rs"),
        );
        assert_eq!(
            attachment.identity(),
            Some("bookmark-https://docs.rs".to_string())
        );
    }

    #[test]
    fn suggestion_without_url_has_no_identity() {
        let attachment =
            Attachment::Suggestion(SuggestionItem::new(SuggestionKind::Search, "Search for \"x\""));
        assert_eq!(attachment.identity(), None);
    }

    #[test]
    fn attachment_serializes_with_a_type_tag() {
        let attachment = Attachment::Suggestion(
            SuggestionItem::new(SuggestionKind::History, "Rust blog")
                .with_url("https://blog.rust-lang.org"),
        );
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "suggestion");
        assert_eq!(json["kind"], "history");
    }
}
