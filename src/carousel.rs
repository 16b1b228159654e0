//! Image carousel.
//!
//! Turns a `.timeline` container into a sliding carousel with prev/next
//! buttons, one dot per entry, keyboard and swipe navigation, and a polite
//! live region announcing the current slide.
//!
//! ## Markup Contract
//!
//! ```text
//! div.timeline                          ← container (gets tabindex/role/aria-label)
//! ├── div.timeline-wrapper              ← slides via transform: translateX(-N00%)
//! │   ├── div.entry
//! │   └── div.entry …
//! ├── div.carousel-nav
//! │   ├── button.prev
//! │   ├── div.carousel-dots             ← filled with button.carousel-dot
//! │   └── button.next
//! └── div.sr-only[aria-live=polite]     ← appended, announces "Slide N of M"
//! ```
//!
//! Anything short of that (no wrapper, no nav, fewer than two entries) is not
//! a carousel and is left alone without error. A container is built at most
//! once: the `data-carousel-init` marker is set before any markup is added.
//!
//! ## Navigation
//!
//! Every way of moving (prev/next buttons, ArrowLeft/ArrowRight, swipe) goes
//! through [`step_index`], which wraps at both ends, and then through
//! [`Carousel::go_to_slide`]. Dots jump straight to their paired entry index.
//! The announcement is the last stage of `go_to_slide`, so each transition
//! announces exactly once.

use crate::dom::{Document, NodeId};
use crate::events::{Event, Key};
use tracing::debug;

/// Selector for carousel containers.
pub const CONTAINER_SELECTOR: &str = ".timeline";
const WRAPPER_SELECTOR: &str = ".timeline-wrapper";
const NAV_SELECTOR: &str = ".carousel-nav";
const ENTRY_SELECTOR: &str = ".entry";
const PREV_SELECTOR: &str = ".prev";
const NEXT_SELECTOR: &str = ".next";
const DOT_HOST_SELECTOR: &str = ".carousel-dots";

const DOT_CLASS: &str = "carousel-dot";
const ACTIVE_CLASS: &str = "active";
/// Attribute set on a container once it has been built.
pub const INIT_MARKER: &str = "data-carousel-init";

/// Horizontal travel, in device pixels, a touch must exceed to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Wrap-around step from `current` in a sequence of `count` entries.
///
/// Previous from the first entry lands on the last; next from the last lands
/// on the first.
pub fn step_index(current: usize, count: usize, direction: Direction) -> usize {
    let last = count.saturating_sub(1);
    match direction {
        Direction::Previous if current == 0 => last,
        Direction::Previous => current - 1,
        Direction::Next if current >= last => 0,
        Direction::Next => current + 1,
    }
}

/// Classify a touch from `start_x` to `end_x`.
///
/// Travel strictly greater than `threshold` is a swipe: leftward (start > end)
/// means next, rightward means previous. Anything shorter is a tap or scroll.
pub fn classify_swipe(start_x: f64, end_x: f64, threshold: f64) -> Option<Direction> {
    let diff = start_x - end_x;
    if diff.abs() <= threshold {
        return None;
    }
    if diff > 0.0 {
        Some(Direction::Next)
    } else {
        Some(Direction::Previous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselSettings {
    pub swipe_threshold: f64,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

/// A dot indicator and the entry index it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub node: NodeId,
    pub index: usize,
}

/// One live carousel, bound to the nodes of its container.
#[derive(Debug, Clone)]
pub struct Carousel {
    container: NodeId,
    wrapper: NodeId,
    prev: NodeId,
    next: NodeId,
    dots: Vec<Dot>,
    live_region: NodeId,
    entry_count: usize,
    current: usize,
    touch_start_x: Option<f64>,
    settings: CarouselSettings,
}

impl Carousel {
    /// Build a carousel on `container`.
    ///
    /// Returns `None`, leaving the document untouched, when the container was
    /// already built or does not hold a complete carousel with at least two
    /// entries.
    pub fn init(
        doc: &mut Document,
        container: NodeId,
        settings: CarouselSettings,
    ) -> Option<Carousel> {
        if doc.has_attr(container, INIT_MARKER) {
            return None;
        }
        let wrapper = doc.query(container, WRAPPER_SELECTOR)?;
        let nav = doc.query(container, NAV_SELECTOR)?;
        let prev = doc.query(nav, PREV_SELECTOR)?;
        let next = doc.query(nav, NEXT_SELECTOR)?;
        let dot_host = doc.query(nav, DOT_HOST_SELECTOR)?;
        let entry_count = doc.query_all(wrapper, ENTRY_SELECTOR).len();
        if entry_count < 2 {
            return None;
        }

        doc.set_attr(container, INIT_MARKER, "true");

        let dots: Vec<Dot> = (0..entry_count)
            .map(|index| {
                let node = doc.create_element("button");
                doc.add_class(node, DOT_CLASS);
                doc.set_attr(node, "aria-label", format!("Go to slide {}", index + 1));
                doc.append_child(dot_host, node);
                Dot { node, index }
            })
            .collect();

        doc.set_attr(container, "tabindex", "0");
        doc.set_attr(container, "role", "region");
        doc.set_attr(container, "aria-label", "Image carousel");

        let live_region = doc.create_element("div");
        doc.set_attr(live_region, "aria-live", "polite");
        doc.set_attr(live_region, "aria-atomic", "true");
        doc.add_class(live_region, "sr-only");
        doc.append_child(container, live_region);

        let mut carousel = Carousel {
            container,
            wrapper,
            prev,
            next,
            dots,
            live_region,
            entry_count,
            current: 0,
            touch_start_x: None,
            settings,
        };
        carousel.go_to_slide(doc, 0);
        debug!(entries = entry_count, "carousel initialized");
        Some(carousel)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn live_region(&self) -> NodeId {
        self.live_region
    }

    /// Current text of the live region.
    pub fn announcement(&self, doc: &Document) -> String {
        doc.text_content(self.live_region)
    }

    /// Show entry `index`.
    ///
    /// Slides the wrapper, syncs every dot, keeps both buttons enabled and
    /// announces the new position. Out-of-range indices are rejected without
    /// touching the document; returns whether the transition ran.
    pub fn go_to_slide(&mut self, doc: &mut Document, index: usize) -> bool {
        if index >= self.entry_count {
            debug!(index, entries = self.entry_count, "ignoring out-of-range slide");
            return false;
        }
        self.current = index;
        doc.set_style(
            self.wrapper,
            "transform",
            format!("translateX(-{}%)", index * 100),
        );
        for dot in &self.dots {
            doc.set_class(dot.node, ACTIVE_CLASS, dot.index == index);
        }
        // Wrap-around means neither button is ever disabled.
        doc.remove_attr(self.prev, "disabled");
        doc.remove_attr(self.next, "disabled");
        self.announce(doc);
        true
    }

    fn announce(&self, doc: &mut Document) {
        let text = format!("Slide {} of {}", self.current + 1, self.entry_count);
        doc.set_text_content(self.live_region, &text);
    }

    /// Move one entry in `direction`, wrapping at the ends.
    pub fn step(&mut self, doc: &mut Document, direction: Direction) -> bool {
        let target = step_index(self.current, self.entry_count, direction);
        self.go_to_slide(doc, target)
    }

    /// React to an event; returns whether a slide transition ran.
    pub fn handle(&mut self, doc: &mut Document, event: &Event) -> bool {
        match event {
            Event::Click { target } => {
                if doc.contains(self.prev, *target) {
                    return self.step(doc, Direction::Previous);
                }
                if doc.contains(self.next, *target) {
                    return self.step(doc, Direction::Next);
                }
                let dot = self
                    .dots
                    .iter()
                    .find(|dot| doc.contains(dot.node, *target))
                    .map(|dot| dot.index);
                match dot {
                    Some(index) => self.go_to_slide(doc, index),
                    None => false,
                }
            }
            Event::KeyDown {
                target: Some(target),
                key,
            } if doc.contains(self.container, *target) => match key {
                Key::ArrowLeft => self.step(doc, Direction::Previous),
                Key::ArrowRight => self.step(doc, Direction::Next),
                _ => false,
            },
            Event::TouchStart { target, point } if doc.contains(self.container, *target) => {
                self.touch_start_x = Some(point.screen_x);
                false
            }
            Event::TouchEnd { target, point } if doc.contains(self.container, *target) => {
                let Some(start_x) = self.touch_start_x.take() else {
                    return false;
                };
                match classify_swipe(start_x, point.screen_x, self.settings.swipe_threshold) {
                    Some(direction) => self.step(doc, direction),
                    None => false,
                }
            }
            _ => false,
        }
    }
}

/// Build every carousel inside `scope` (an element id), or in the whole
/// document when `scope` is `None`.
///
/// Safe to call repeatedly: already-built containers and containers without
/// carousel markup are skipped, and an unknown scope yields nothing.
pub fn init_carousels(
    doc: &mut Document,
    scope: Option<&str>,
    settings: CarouselSettings,
) -> Vec<Carousel> {
    let root = match scope {
        Some(id) => match doc.get_element_by_id(id) {
            Some(node) => node,
            None => return Vec::new(),
        },
        None => doc.root(),
    };
    doc.query_all(root, CONTAINER_SELECTOR)
        .into_iter()
        .filter_map(|container| Carousel::init(doc, container, settings))
        .collect()
}
