//! Image lightbox.
//!
//! A full-viewport overlay (`#lightbox`) showing one `.screenshot` image at a
//! time with its alt text as caption. Clicking the large image toggles
//! `zoomed`. The close button, a click on the overlay backdrop or Escape
//! close it again.
//!
//! While open, the body's `overflow` is `hidden` so the page behind does not
//! scroll.

use crate::dom::{Document, NodeId};
use crate::events::{Event, Key};
use tracing::debug;

const IMAGE_SELECTOR: &str = ".screenshot";
const ACTIVE_CLASS: &str = "active";
const ZOOMED_CLASS: &str = "zoomed";

#[derive(Debug, Clone)]
pub struct Lightbox {
    overlay: NodeId,
    image: NodeId,
    close: NodeId,
    caption: NodeId,
    /// Thumbnails bound so far, in binding order.
    bound: Vec<NodeId>,
}

impl Lightbox {
    /// Attach to the overlay markup. `None` when any part is missing.
    pub fn attach(doc: &Document) -> Option<Lightbox> {
        Some(Lightbox {
            overlay: doc.get_element_by_id("lightbox")?,
            image: doc.get_element_by_id("lightboxImg")?,
            close: doc.get_element_by_id("lightboxClose")?,
            caption: doc.get_element_by_id("lightboxCaption")?,
            bound: Vec::new(),
        })
    }

    /// Make every `.screenshot` under `scope` (an element id, or the whole
    /// document) open the lightbox. Returns how many images were newly bound.
    pub fn bind(&mut self, doc: &mut Document, scope: Option<&str>) -> usize {
        let root = match scope {
            Some(id) => match doc.get_element_by_id(id) {
                Some(node) => node,
                None => return 0,
            },
            None => doc.root(),
        };
        let mut added = 0;
        for img in doc.query_all(root, IMAGE_SELECTOR) {
            doc.set_style(img, "cursor", "pointer");
            if !self.bound.contains(&img) {
                self.bound.push(img);
                added += 1;
            }
        }
        // Replaced tab content leaves stale handles behind.
        self.bound.retain(|&n| doc.is_attached(n));
        debug!(?scope, added, "lightbox images bound");
        added
    }

    pub fn bound(&self) -> &[NodeId] {
        &self.bound
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.overlay, ACTIVE_CLASS)
    }

    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    pub fn image(&self) -> NodeId {
        self.image
    }

    pub fn close_button(&self) -> NodeId {
        self.close
    }

    /// Show `thumbnail` in the overlay.
    pub fn open(&self, doc: &mut Document, thumbnail: NodeId) {
        let src = doc.attr(thumbnail, "src").unwrap_or_default().to_string();
        let alt = doc.attr(thumbnail, "alt").unwrap_or_default().to_string();
        doc.add_class(self.overlay, ACTIVE_CLASS);
        doc.set_attr(self.image, "src", src);
        doc.set_attr(self.image, "alt", alt.as_str());
        doc.set_text_content(self.caption, &alt);
        doc.remove_class(self.image, ZOOMED_CLASS);
        let body = doc.body();
        doc.set_style(body, "overflow", "hidden");
    }

    pub fn close(&self, doc: &mut Document) {
        doc.remove_class(self.overlay, ACTIVE_CLASS);
        let body = doc.body();
        doc.remove_style(body, "overflow");
        doc.remove_class(self.image, ZOOMED_CLASS);
    }

    /// React to an event; returns whether the lightbox changed.
    pub fn handle(&self, doc: &mut Document, event: &Event) -> bool {
        match event {
            Event::Click { target } => {
                let target = *target;
                if let Some(&thumb) = self.bound.iter().find(|&&img| img == target) {
                    self.open(doc, thumb);
                    return true;
                }
                if target == self.image {
                    doc.toggle_class(self.image, ZOOMED_CLASS);
                    return true;
                }
                // Only the backdrop itself closes; clicks on the caption don't.
                if doc.contains(self.close, target) || target == self.overlay {
                    self.close(doc);
                    return true;
                }
                false
            }
            Event::KeyDown {
                key: Key::Escape, ..
            } if self.is_open(doc) => {
                self.close(doc);
                true
            }
            _ => false,
        }
    }
}
