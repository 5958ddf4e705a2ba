//! Ordered-unique collection of message attachments.

use std::collections::HashSet;

use indexmap::IndexMap;
use tabchat_protocol::attachment::Attachment;

/// Attachments riding along with the current draft, keyed by identity.
///
/// Insertion order is display order. Identity-based dedup lives here and
/// only here; callers never pre-check for duplicates.
#[derive(Debug, Default)]
pub struct PillCollection {
    pills: IndexMap<String, Attachment>,
}

impl PillCollection {
    /// Attach `attachment`. A duplicate identity or a missing identity is a
    /// silent no-op. Returns whether the collection changed.
    pub fn add(&mut self, attachment: Attachment) -> bool {
        let Some(identity) = attachment.identity() else {
            tracing::debug!("ignoring attachment without identity: {}", attachment.title());
            return false;
        };
        if self.pills.contains_key(&identity) {
            tracing::debug!("ignoring duplicate pill {identity}");
            return false;
        }
        self.pills.insert(identity, attachment);
        true
    }

    /// Detach the pill with `identity`, keeping the order of the rest.
    /// Returns whether the collection changed.
    pub fn remove(&mut self, identity: &str) -> bool {
        self.pills.shift_remove(identity).is_some()
    }

    pub fn clear(&mut self) {
        self.pills.clear();
    }

    pub fn has(&self, identity: &str) -> bool {
        self.pills.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.pills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pills.is_empty()
    }

    /// Attachments in insertion order.
    pub fn list(&self) -> Vec<Attachment> {
        self.pills.values().cloned().collect()
    }

    /// Identities of the attached tabs, used to pre-check checkboxes when
    /// the tabs menu opens.
    pub fn tab_identities(&self) -> HashSet<String> {
        self.pills
            .iter()
            .filter(|(_, attachment)| matches!(attachment, Attachment::Tab(_)))
            .map(|(identity, _)| identity.clone())
            .collect()
    }
}
