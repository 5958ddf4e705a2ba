//! Detection of the in-progress `@` trigger immediately before the cursor.
//!
//! The parser only ever sees a short window of text ending at the cursor;
//! the caller chooses the window for the job at hand. [`TRIGGER_WINDOW`] is
//! long enough to hold `@` plus the longest command name, [`CLEANUP_WINDOW`]
//! leaves room for a few extra characters typed past it.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Window scanned during live typing and before a completion rewrite.
pub const TRIGGER_WINDOW: usize = 10;

/// Wider window used to locate the full token when cleaning up after apply.
pub const CLEANUP_WINDOW: usize = 15;

static TRIGGER_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"@(\w*)$"));

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Panic is ok thanks to the `load_regex` test.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// An `@` trigger found at the end of the scanned window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtTrigger {
    /// Word characters after the `@`, lower-cased. Empty right after `@`.
    pub token: String,
    /// Length in characters of the raw token, excluding the `@`.
    pub token_len: usize,
}

impl AtTrigger {
    /// Characters to delete to consume the whole trigger, `@` included.
    pub fn span_len(&self) -> usize {
        self.token_len + 1
    }
}

/// Scan `window` for a trailing `@token`.
///
/// The match anchors at the end of the window: any non-word character
/// between the `@` and the cursor means no trigger. What precedes the `@`
/// is irrelevant, so `user@domain` with the cursor at the end is a trigger
/// with token `domain`.
pub fn find_trigger(window: &str) -> Option<AtTrigger> {
    let captures = TRIGGER_REGEX.captures(window)?;
    let token_match = captures.get(1)?;
    let raw = token_match.as_str();
    Some(AtTrigger {
        token: raw.to_lowercase(),
        token_len: raw.chars().count(),
    })
}
