//! Data sources the composer pulls tabs, history, and bookmarks from.
//!
//! Providers are capability-shaped: a `None` from any accessor means the
//! backing store does not exist in this host, and the matching `@` command
//! is simply not offered. `revision` is the explicit staleness signal; it
//! advances whenever the underlying data changes wholesale (for example a
//! profile switch), and the composer recomputes suggestions when it sees a
//! revision it has not seen before.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use tabchat_protocol::items::SuggestionItem;
use tabchat_protocol::items::TabItem;
use thiserror::Error;

pub trait DataProvider {
    /// Open tabs, or `None` when the host exposes no tab store.
    fn tabs(&self) -> Option<Vec<TabItem>>;

    /// History entries, pre-sorted by the host (descending visit count,
    /// ties broken by recency), or `None` when unavailable.
    fn history(&self) -> Option<Vec<SuggestionItem>>;

    /// Bookmark entries, or `None` when unavailable.
    fn bookmarks(&self) -> Option<Vec<SuggestionItem>>;

    /// Monotonic data generation. A change invalidates cached suggestions.
    fn revision(&self) -> u64;
}

/// Fixed in-memory provider for tests and simple embeddings.
#[derive(Debug, Default)]
pub struct StaticProvider {
    tabs: Option<Vec<TabItem>>,
    history: Option<Vec<SuggestionItem>>,
    bookmarks: Option<Vec<SuggestionItem>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tabs(mut self, tabs: Vec<TabItem>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn with_history(mut self, history: Vec<SuggestionItem>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_bookmarks(mut self, bookmarks: Vec<SuggestionItem>) -> Self {
        self.bookmarks = Some(bookmarks);
        self
    }
}

impl DataProvider for StaticProvider {
    fn tabs(&self) -> Option<Vec<TabItem>> {
        self.tabs.clone()
    }

    fn history(&self) -> Option<Vec<SuggestionItem>> {
        self.history.clone()
    }

    fn bookmarks(&self) -> Option<Vec<SuggestionItem>> {
        self.bookmarks.clone()
    }

    fn revision(&self) -> u64 {
        0
    }
}

/// One named profile's data set.
#[derive(Debug, Clone, Default)]
pub struct ProfileData {
    pub tabs: Option<Vec<TabItem>>,
    pub history: Option<Vec<SuggestionItem>>,
    pub bookmarks: Option<Vec<SuggestionItem>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("unknown profile `{0}`")]
    UnknownProfile(String),
}

#[derive(Debug)]
struct ProfileState {
    profiles: HashMap<String, ProfileData>,
    active: String,
    revision: u64,
}

/// Named profiles shared between the composer and the host's settings
/// surface. Clones share the same underlying state; switching the active
/// profile bumps the revision so open composers refresh their suggestions.
#[derive(Debug, Clone)]
pub struct SharedProfiles {
    state: Arc<Mutex<ProfileState>>,
}

impl SharedProfiles {
    pub fn new(name: impl Into<String>, data: ProfileData) -> Self {
        let name = name.into();
        let mut profiles = HashMap::new();
        profiles.insert(name.clone(), data);
        Self {
            state: Arc::new(Mutex::new(ProfileState {
                profiles,
                active: name,
                revision: 0,
            })),
        }
    }

    /// Insert or replace a profile. Replacing the active profile's data
    /// counts as a data change.
    pub fn upsert_profile(&self, name: impl Into<String>, data: ProfileData) {
        let name = name.into();
        #[expect(clippy::unwrap_used)]
        let mut st = self.state.lock().unwrap();
        let is_active = st.active == name;
        st.profiles.insert(name, data);
        if is_active {
            st.revision += 1;
        }
    }

    pub fn switch_profile(&self, name: &str) -> Result<(), ProfileError> {
        #[expect(clippy::unwrap_used)]
        let mut st = self.state.lock().unwrap();
        if !st.profiles.contains_key(name) {
            return Err(ProfileError::UnknownProfile(name.to_string()));
        }
        if st.active != name {
            st.active = name.to_string();
            st.revision += 1;
            tracing::debug!("switched to profile {name}");
        }
        Ok(())
    }

    pub fn active_profile(&self) -> String {
        #[expect(clippy::unwrap_used)]
        let st = self.state.lock().unwrap();
        st.active.clone()
    }

    fn active_data<T>(&self, pick: impl Fn(&ProfileData) -> T) -> T {
        #[expect(clippy::unwrap_used)]
        let st = self.state.lock().unwrap();
        match st.profiles.get(&st.active) {
            Some(data) => pick(data),
            // The active name always refers to an existing profile; keep
            // this arm total anyway.
            None => pick(&ProfileData::default()),
        }
    }
}

impl DataProvider for SharedProfiles {
    fn tabs(&self) -> Option<Vec<TabItem>> {
        self.active_data(|data| data.tabs.clone())
    }

    fn history(&self) -> Option<Vec<SuggestionItem>> {
        self.active_data(|data| data.history.clone())
    }

    fn bookmarks(&self) -> Option<Vec<SuggestionItem>> {
        self.active_data(|data| data.bookmarks.clone())
    }

    fn revision(&self) -> u64 {
        #[expect(clippy::unwrap_used)]
        let st = self.state.lock().unwrap();
        st.revision
    }
}
