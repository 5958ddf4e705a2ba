//! Outbound notifications from the composer to its host.

use tabchat_protocol::attachment::Attachment;
use tokio::sync::mpsc::UnboundedSender;

/// Events the host reacts to. State is read back through the composer's
/// accessors, so most events carry no payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// A surface changed; re-render from the accessors.
    Redraw,
    /// The pill collection changed; re-render the pill row.
    PillsChanged(Vec<Attachment>),
    /// A message left the composer. `target` is the pending navigation url
    /// when a suggestion was committed, otherwise the raw text.
    Send { target: String, pill_count: usize },
    /// Shift+Tab with no menu open: hand focus to the settings control.
    FocusSettings,
}

/// Clonable handle the composer notifies the host through. Sending to a
/// receiver that went away is logged, never propagated.
#[derive(Debug, Clone)]
pub struct ComposerEventSender {
    tx: UnboundedSender<ComposerEvent>,
}

impl ComposerEventSender {
    pub fn new(tx: UnboundedSender<ComposerEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: ComposerEvent) {
        if let Err(err) = self.tx.send(event) {
            tracing::warn!("composer event receiver dropped: {err}");
        }
    }
}
