//! Browser events as plain values.
//!
//! A [`Page`](crate::page::Page) receives one [`Event`] at a time and hands it
//! to every component, the way a browser runs each listener for an event to
//! completion before the next event is processed.

use crate::context::HistoryState;
use crate::dom::NodeId;

/// A keyboard key, named the way `KeyboardEvent.key` names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Screen coordinates of a touch point (`Touch.screenX` / `screenY`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub screen_x: f64,
    pub screen_y: f64,
}

impl TouchPoint {
    pub fn new(screen_x: f64, screen_y: f64) -> Self {
        Self { screen_x, screen_y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click {
        target: NodeId,
    },
    /// `target` is the focused element; `None` when focus is on the document.
    KeyDown {
        target: Option<NodeId>,
        key: Key,
    },
    TouchStart {
        target: NodeId,
        point: TouchPoint,
    },
    TouchEnd {
        target: NodeId,
        point: TouchPoint,
    },
    /// A form control changed; `checked` is the control's new state.
    Change {
        target: NodeId,
        checked: bool,
    },
    Scroll {
        y: f64,
    },
    PopState {
        state: Option<HistoryState>,
    },
}

/// What dispatching an event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// At least one component reacted to the event.
    pub handled: bool,
    /// A listener called `preventDefault()`.
    pub default_prevented: bool,
}
