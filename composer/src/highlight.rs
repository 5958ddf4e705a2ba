//! Highlight bookkeeping for the two list surfaces.
//!
//! The command menu always highlights a row (index 0 after every show) and
//! distinguishes wrapping keys from clamping keys. The suggestion dropdown
//! opens with nothing highlighted and can return to that baseline, so its
//! cursor is an `Option`.

/// Highlight for command-menu lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WrapCursor {
    index: usize,
}

impl WrapCursor {
    pub(crate) fn reset(&mut self) {
        self.index = 0;
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Tab: advance with wraparound.
    pub(crate) fn wrap_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = (self.index + 1) % len;
    }

    /// Shift+Tab: retreat with wraparound.
    pub(crate) fn wrap_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = if self.index == 0 {
            len - 1
        } else {
            self.index - 1
        };
    }

    /// ArrowDown: advance and stop on the last row.
    pub(crate) fn clamp_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = (self.index + 1).min(len - 1);
    }

    /// ArrowUp: retreat and stop on the first row.
    pub(crate) fn clamp_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }
}

/// Highlight for the suggestion dropdown. `None` is the baseline: dropdown
/// open, nothing highlighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BaselineCursor {
    index: Option<usize>,
}

impl BaselineCursor {
    pub(crate) fn reset(&mut self) {
        self.index = None;
    }

    pub(crate) fn index(&self) -> Option<usize> {
        self.index
    }

    /// ArrowDown: leave the baseline onto row 0, then clamp at the last row.
    pub(crate) fn down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = Some(match self.index {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    /// ArrowUp: retreat, returning to the baseline from row 0.
    pub(crate) fn up(&mut self) {
        self.index = match self.index {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }
}
