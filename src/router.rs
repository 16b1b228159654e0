//! Tab router.
//!
//! Tabs are `.tab-content` panels paired with `.tab-button`s through
//! `aria-controls`. Exactly the panel and button for the shown tab carry
//! `active`; every other button reads `aria-selected="false"`.
//!
//! Showing a tab from a click pushes a history entry (`{ tab }`, `#tab`).
//! Back/forward pop-state events restore the tab from the entry's state,
//! falling back to the location hash and then to the configured default.

use crate::context::{HistoryState, Navigation};
use crate::dom::{Document, NodeId};
use tracing::debug;

const PANEL_SELECTOR: &str = ".tab-content";
const BUTTON_SELECTOR: &str = ".tab-button";
const TRIGGER_SELECTOR: &str = "[data-tab]";
const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone)]
pub struct TabRouter {
    default_tab: String,
}

impl TabRouter {
    pub fn new(default_tab: impl Into<String>) -> Self {
        Self {
            default_tab: default_tab.into(),
        }
    }

    pub fn default_tab(&self) -> &str {
        &self.default_tab
    }

    /// Make `tab` the visible tab, optionally recording it in history.
    ///
    /// An unknown tab id still deactivates everything; nothing is shown.
    pub fn show_tab(&self, doc: &mut Document, nav: &mut dyn Navigation, tab: &str, push: bool) {
        for panel in doc.query_all(doc.root(), PANEL_SELECTOR) {
            doc.remove_class(panel, ACTIVE_CLASS);
        }
        for button in doc.query_all(doc.root(), BUTTON_SELECTOR) {
            doc.remove_class(button, ACTIVE_CLASS);
            doc.set_attr(button, "aria-selected", "false");
        }

        match doc.get_element_by_id(tab) {
            Some(panel) => doc.add_class(panel, ACTIVE_CLASS),
            None => debug!(tab, "no panel for tab"),
        }

        let selected = doc
            .query_all(doc.root(), BUTTON_SELECTOR)
            .into_iter()
            .filter(|&b| doc.attr(b, "aria-controls") == Some(tab))
            .collect::<Vec<_>>();
        for button in selected {
            doc.add_class(button, ACTIVE_CLASS);
            doc.set_attr(button, "aria-selected", "true");
        }

        if push {
            nav.push_state(HistoryState::tab(tab), &format!("#{tab}"));
        }
    }

    /// Restore the tab for a history entry.
    pub fn pop_state(
        &self,
        doc: &mut Document,
        nav: &mut dyn Navigation,
        state: Option<&HistoryState>,
    ) {
        let tab = state
            .map(|s| s.tab.clone())
            .filter(|tab| !tab.is_empty())
            .or_else(|| hash_tab(&*nav))
            .unwrap_or_else(|| self.default_tab.clone());
        self.show_tab(doc, nav, &tab, false);
    }

    /// Delegated click handling for anything carrying `data-tab`.
    ///
    /// Returns `true` when the click was a tab trigger; the caller should
    /// treat that as `preventDefault()`.
    pub fn click(&self, doc: &mut Document, nav: &mut dyn Navigation, target: NodeId) -> bool {
        let Some(trigger) = doc.closest(target, TRIGGER_SELECTOR) else {
            return false;
        };
        let Some(tab) = doc.attr(trigger, "data-tab").map(str::to_string) else {
            return false;
        };
        self.show_tab(doc, nav, &tab, true);
        true
    }

    /// Show the tab named by the location hash, if any, without pushing.
    pub fn show_initial(&self, doc: &mut Document, nav: &mut dyn Navigation) -> Option<String> {
        let tab = hash_tab(&*nav)?;
        self.show_tab(doc, nav, &tab, false);
        Some(tab)
    }
}

/// Location hash without the leading `#`, if non-empty.
fn hash_tab(nav: &dyn Navigation) -> Option<String> {
    let hash = nav.hash();
    let tab = hash.strip_prefix('#').unwrap_or(&hash);
    (!tab.is_empty()).then(|| tab.to_string())
}
