//! Injected browser context.
//!
//! Components never reach for ambient globals. The page is constructed with
//! explicit context objects instead:
//!
//! | Browser global | Context | Implementations |
//! |---|---|---|
//! | `history`, `location.hash` | [`Navigation`] | [`MemoryHistory`] |
//! | `localStorage` | [`Storage`] | [`MemoryStorage`], [`FileStorage`] |
//! | `matchMedia('(prefers-color-scheme: dark)')` | [`Environment`] | plain value |

use crate::events::Event;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// State object pushed with each tab change (`{ tab: "code" }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub tab: String,
}

impl HistoryState {
    pub fn tab(tab: &str) -> Self {
        Self {
            tab: tab.to_string(),
        }
    }
}

/// Session history and the current location.
pub trait Navigation {
    /// `history.pushState(state, '', url)`.
    fn push_state(&mut self, state: HistoryState, url: &str);

    /// `location.hash`, including the leading `#`, or empty.
    fn hash(&self) -> String;

    /// Step back one entry; returns the `popstate` event to dispatch.
    fn back(&mut self) -> Option<Event>;

    /// Step forward one entry; returns the `popstate` event to dispatch.
    fn forward(&mut self) -> Option<Event>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    state: Option<HistoryState>,
    url: String,
}

/// In-memory session history.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl MemoryHistory {
    /// Start a session at `url` (e.g. `index.html#objects`).
    pub fn new(url: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                state: None,
                url: url.to_string(),
            }],
            index: 0,
        }
    }

    /// Entries in the session; never zero, the starting page counts.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn url(&self) -> &str {
        &self.entries[self.index].url
    }

    pub fn state(&self) -> Option<&HistoryState> {
        self.entries[self.index].state.as_ref()
    }

    fn pop_state(&self) -> Event {
        Event::PopState {
            state: self.entries[self.index].state.clone(),
        }
    }
}

/// Resolve `url` against `base` the way a fragment-only push does: a
/// `#hash` keeps the base path, anything else replaces it.
fn resolve_url(base: &str, url: &str) -> String {
    if url.starts_with('#') {
        let path = base.split_once('#').map_or(base, |(path, _)| path);
        format!("{path}{url}")
    } else {
        url.to_string()
    }
}

impl Navigation for MemoryHistory {
    fn push_state(&mut self, state: HistoryState, url: &str) {
        let url = resolve_url(self.url(), url);
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            state: Some(state),
            url,
        });
        self.index += 1;
    }

    fn hash(&self) -> String {
        self.url()
            .split_once('#')
            .map(|(_, hash)| format!("#{hash}"))
            .filter(|hash| hash.len() > 1)
            .unwrap_or_default()
    }

    fn back(&mut self) -> Option<Event> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.pop_state())
    }

    fn forward(&mut self) -> Option<Event> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.pop_state())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value persistence (`localStorage`).
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted as a flat JSON object on disk.
///
/// The file is read on every `get_item` and rewritten on every `set_item`;
/// a missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        Ok(())
    }
}

/// User-agent preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    pub prefers_dark: bool,
}
