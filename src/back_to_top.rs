//! Back-to-top button.
//!
//! `#backToTop` gets `visible` once the page is scrolled past an offset and
//! loses it again above. Clicking it asks the page to scroll to the top.

use crate::dom::{Document, NodeId};
use crate::events::Event;

const VISIBLE_CLASS: &str = "visible";

/// Default scroll depth, in px, past which the button shows.
pub const DEFAULT_OFFSET: f64 = 300.0;

/// What the button wants done after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackToTopAction {
    /// Visibility was updated for a scroll position.
    Updated,
    /// Scroll the page to `y = 0`.
    ScrollToTop,
}

#[derive(Debug, Clone)]
pub struct BackToTop {
    button: NodeId,
    offset: f64,
}

impl BackToTop {
    pub fn attach(doc: &Document, offset: f64) -> Option<BackToTop> {
        let button = doc.get_element_by_id("backToTop")?;
        Some(BackToTop { button, offset })
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn is_visible(&self, doc: &Document) -> bool {
        doc.has_class(self.button, VISIBLE_CLASS)
    }

    /// Strictly past the offset shows the button.
    pub fn update(&self, doc: &mut Document, scroll_y: f64) {
        doc.set_class(self.button, VISIBLE_CLASS, scroll_y > self.offset);
    }

    pub fn handle(&self, doc: &mut Document, event: &Event) -> Option<BackToTopAction> {
        match event {
            Event::Scroll { y } => {
                self.update(doc, *y);
                Some(BackToTopAction::Updated)
            }
            Event::Click { target } if doc.contains(self.button, *target) => {
                Some(BackToTopAction::ScrollToTop)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, BackToTop) {
        let doc = Document::parse(r#"<p id="text"></p><button id="backToTop">↑</button>"#);
        let button = BackToTop::attach(&doc, DEFAULT_OFFSET).unwrap();
        (doc, button)
    }

    #[test]
    fn visibility_follows_scroll_depth() {
        let (mut doc, button) = setup();
        for (y, visible) in [
            (0.0, false),
            (300.0, false),
            (301.0, true),
            (1200.0, true),
            (12.0, false),
        ] {
            button.handle(&mut doc, &Event::Scroll { y });
            assert_eq!(button.is_visible(&doc), visible, "at y = {y}");
        }
    }

    #[test]
    fn click_requests_scroll_to_top() {
        let (mut doc, button) = setup();
        let target = button.button();
        assert_eq!(
            button.handle(&mut doc, &Event::Click { target }),
            Some(BackToTopAction::ScrollToTop)
        );

        let text = doc.get_element_by_id("text").unwrap();
        assert_eq!(button.handle(&mut doc, &Event::Click { target: text }), None);
    }

    #[test]
    fn missing_button_is_a_no_op() {
        let doc = Document::parse("<p></p>");
        assert!(BackToTop::attach(&doc, DEFAULT_OFFSET).is_none());
    }
}
