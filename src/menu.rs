//! Mobile navigation menu.
//!
//! `#menuToggle` opens and closes `#navMenu` by toggling its `open` class and
//! mirrors the state in the toggle's `aria-expanded`. An open menu closes on
//! Escape and when one of its tab buttons is clicked.

use crate::dom::{Document, NodeId};
use crate::events::{Event, Key};

const OPEN_CLASS: &str = "open";

#[derive(Debug, Clone)]
pub struct MobileMenu {
    toggle: NodeId,
    menu: NodeId,
}

impl MobileMenu {
    pub fn attach(doc: &Document) -> Option<MobileMenu> {
        Some(MobileMenu {
            toggle: doc.get_element_by_id("menuToggle")?,
            menu: doc.get_element_by_id("navMenu")?,
        })
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.menu, OPEN_CLASS)
    }

    pub fn toggle(&self) -> NodeId {
        self.toggle
    }

    fn set_open(&self, doc: &mut Document, open: bool) {
        doc.set_class(self.menu, OPEN_CLASS, open);
        doc.set_attr(self.toggle, "aria-expanded", if open { "true" } else { "false" });
    }

    pub fn handle(&self, doc: &mut Document, event: &Event) -> bool {
        match event {
            Event::Click { target } if doc.contains(self.toggle, *target) => {
                let open = !self.is_open(doc);
                self.set_open(doc, open);
                true
            }
            Event::Click { target } if doc.contains(self.menu, *target) => {
                let on_tab = doc
                    .closest(*target, ".tab-button")
                    .is_some_and(|button| doc.contains(self.menu, button));
                if on_tab {
                    self.set_open(doc, false);
                }
                on_tab
            }
            Event::KeyDown {
                key: Key::Escape, ..
            } if self.is_open(doc) => {
                self.set_open(doc, false);
                true
            }
            _ => false,
        }
    }
}
